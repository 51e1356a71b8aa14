use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::catalog::Catalog;

use super::backend::{SearchBackend, SearchError, SearchRequest};

/// What a finished search did to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSummary {
    pub query: String,
    pub genre: String,
    /// Results returned by the backend.
    pub found: usize,
    /// Results whose id was new to the catalog.
    pub added: usize,
}

/// Run `request` against `backend` and merge the results into `catalog`.
///
/// The catalog is only touched once the backend has answered, in one merge,
/// so a failed or abandoned search leaves it unchanged.
pub async fn run_search<B: SearchBackend>(
    backend: &B,
    request: &SearchRequest,
    catalog: &Catalog,
) -> Result<SearchSummary, SearchError> {
    tracing::debug!("searching {:?} (max {})", request.query, request.max_results);
    let records = backend.search(request).await?;

    let genre = request.target_genre();
    let tracks: Vec<_> = records.iter().map(|r| request.to_track(r)).collect();
    let found = tracks.len();
    let added = catalog.merge(&genre, tracks);

    tracing::info!("search {:?}: {found} results, {added} new, filed under {genre:?}", request.query);
    Ok(SearchSummary {
        query: request.query.clone(),
        genre,
        found,
        added,
    })
}

/// A search running in the background.
pub struct SearchTask {
    query: String,
    genre: String,
    handle: JoinHandle<Result<SearchSummary, SearchError>>,
}

impl SearchTask {
    /// Spawn on the current tokio runtime.
    ///
    /// Panics when called outside a runtime, like `tokio::spawn`.
    pub fn spawn<B: SearchBackend>(
        backend: Arc<B>,
        request: SearchRequest,
        catalog: Arc<Catalog>,
    ) -> Self {
        Self::spawn_on(&Handle::current(), backend, request, catalog)
    }

    /// Spawn on an explicit runtime; used from synchronous code such as the
    /// terminal event loop.
    pub fn spawn_on<B: SearchBackend>(
        runtime: &Handle,
        backend: Arc<B>,
        request: SearchRequest,
        catalog: Arc<Catalog>,
    ) -> Self {
        let query = request.query.clone();
        let genre = request.target_genre();
        let handle = runtime.spawn(async move {
            run_search(backend.as_ref(), &request, &catalog).await
        });
        Self {
            query,
            genre,
            handle,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Genre the results will be filed under.
    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Abandon the search. A later `join` yields `SearchError::Cancelled`.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub async fn join(self) -> Result<SearchSummary, SearchError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(SearchError::Cancelled),
            Err(e) => Err(SearchError::Network(format!("search task failed: {e}"))),
        }
    }
}
