use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::catalog::{Origin, Track, genre_source_id};
use crate::config::SearchSettings;

use super::duration::iso8601_seconds;

/// Prefix of the genre search results land in when the request names none.
pub const SEARCH_GENRE_PREFIX: &str = "Search_";

const WATCH_URL_PREFIX: &str = "https://youtu.be/";

/// Errors that can occur while searching.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The service (or its local stand-in) cannot be reached at all.
    #[error("search service unavailable: {0}")]
    Unavailable(String),

    /// No account selected or consent missing.
    #[error("search not authorized: {0}")]
    Unauthorized(String),

    #[error("search request failed: {0}")]
    Network(String),

    #[error("search cancelled")]
    Cancelled,
}

/// A keyword search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    /// Genre results are filed under; `Search_<query>` when unset.
    pub genre: Option<String>,
    pub max_results: u32,
    pub category_id: String,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, settings: &SearchSettings) -> Self {
        Self {
            query: query.into(),
            genre: None,
            max_results: settings.max_results,
            category_id: settings.category_id.clone(),
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn target_genre(&self) -> String {
        self.genre
            .clone()
            .unwrap_or_else(|| format!("{SEARCH_GENRE_PREFIX}{}", self.query))
    }

    /// Map one result to a catalog track: album is the query, source is the
    /// watch URL and the id is `hash(genre + source)`.
    pub fn to_track(&self, record: &VideoRecord) -> Track {
        let genre = self.target_genre();
        let source = format!("{WATCH_URL_PREFIX}{}", record.id);
        let secs = iso8601_seconds(record.duration.as_deref());

        Track {
            id: genre_source_id(&genre, &source),
            title: record.title.clone(),
            artist: None,
            album: self.query.clone(),
            genre,
            source,
            duration: Duration::from_secs(secs),
            origin: Origin::Search,
        }
    }
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    /// ISO-8601 duration such as `PT2M58S`.
    pub duration: Option<String>,
    pub category_id: Option<String>,
}

/// Something that can answer a `SearchRequest`.
pub trait SearchBackend: Send + Sync + 'static {
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<Vec<VideoRecord>, SearchError>> + Send;
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    #[serde(default)]
    snippet: Option<Snippet>,
    #[serde(default, rename = "contentDetails")]
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default, rename = "categoryId")]
    category_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    #[serde(default)]
    duration: Option<String>,
}

impl From<VideoItem> for VideoRecord {
    fn from(item: VideoItem) -> Self {
        let (title, category_id) = match item.snippet {
            Some(s) => (s.title, s.category_id),
            None => (String::new(), None),
        };
        Self {
            id: item.id,
            title,
            duration: item.content_details.and_then(|c| c.duration),
            category_id,
        }
    }
}

/// Backend that answers from recorded video-list responses, one file per
/// query: `<dir>/<slug>.json`, where the slug is the lowercased query with
/// every non-alphanumeric run replaced by `-`.
#[derive(Debug, Clone)]
pub struct RecordedBackend {
    dir: PathBuf,
}

impl RecordedBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn response_path(&self, query: &str) -> PathBuf {
        self.dir.join(format!("{}.json", query_slug(query)))
    }
}

pub fn query_slug(query: &str) -> String {
    let mut slug = String::new();
    for c in query.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

impl SearchBackend for RecordedBackend {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<VideoRecord>, SearchError> {
        if !self.dir.is_dir() {
            return Err(SearchError::Unavailable(format!(
                "no recorded responses in {}",
                self.dir.display()
            )));
        }

        let path = self.response_path(&request.query);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SearchError::Network(format!(
                    "no recorded response for {:?}",
                    request.query
                )));
            }
            Err(e) => {
                return Err(SearchError::Network(format!("{}: {e}", path.display())));
            }
        };

        let response: VideoListResponse = serde_json::from_str(&text)
            .map_err(|e| SearchError::Network(format!("{}: {e}", path.display())))?;

        let records = response
            .items
            .into_iter()
            .map(VideoRecord::from)
            .filter(|r| {
                r.category_id
                    .as_deref()
                    .map(|c| c == request.category_id)
                    .unwrap_or(true)
            })
            .take(request.max_results as usize)
            .collect();
        Ok(records)
    }
}
