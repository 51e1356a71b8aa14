use std::collections::HashMap;
use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::model::{Origin, Track, TrackId};
use super::store::{CatalogStore, StoreError};

/// Tracks and genre names produced by one source.
#[derive(Debug, Clone, Default)]
pub struct Harvest {
    pub tracks: Vec<Track>,
    pub genres: Vec<String>,
}

/// A producer the catalog can be loaded from.
///
/// `Ok(None)` means the source has nothing to offer (missing file, missing
/// directory); `Err` is a hard failure the catalog degrades from.
pub trait TrackSource {
    type Error: fmt::Display;

    fn describe(&self) -> String;
    fn harvest(&self) -> Result<Option<Harvest>, Self::Error>;
}

/// What `Catalog::load` found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The source produced this many tracks.
    Populated(usize),
    /// The source was absent or had no tracks.
    Empty,
    /// The source failed; the catalog was left empty.
    Degraded(String),
}

/// Result of `Catalog::insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The track was new and now heads its genre list.
    Added(TrackId),
    /// The id was already indexed; the catalog kept the existing entry.
    Existing(TrackId),
}

impl InsertOutcome {
    pub fn id(&self) -> &TrackId {
        match self {
            InsertOutcome::Added(id) | InsertOutcome::Existing(id) => id,
        }
    }
}

#[derive(Debug, Default)]
struct Index {
    by_id: HashMap<TrackId, Track>,
    // Genre lists hold ids only, so every listed track is in `by_id`.
    by_genre: HashMap<String, Vec<TrackId>>,
    genres: Vec<String>,
}

impl Index {
    fn add_genre(&mut self, genre: &str) -> bool {
        if self.genres.iter().any(|g| g == genre) {
            return false;
        }
        self.genres.push(genre.to_string());
        true
    }

    /// Insert unless the id is taken; first writer wins.
    fn insert_if_absent(&mut self, genre: &str, track: Track, front: bool) -> bool {
        if self.by_id.contains_key(&track.id) {
            return false;
        }
        self.add_genre(genre);
        let list = self.by_genre.entry(genre.to_string()).or_default();
        if front {
            list.insert(0, track.id.clone());
        } else {
            list.push(track.id.clone());
        }
        self.by_id.insert(track.id.clone(), track);
        true
    }

    fn resolve(&self, ids: &[TrackId]) -> Vec<Track> {
        ids.iter().filter_map(|id| self.by_id.get(id)).cloned().collect()
    }
}

/// Shared, thread-safe catalog index. Wrap in `Arc` to hand it to producers
/// running on other threads.
#[derive(Debug, Default)]
pub struct Catalog {
    index: RwLock<Index>,
    store: Option<CatalogStore>,
}

impl Catalog {
    /// A catalog with no backing file. Inserts and deletes touch memory only.
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog whose inserts and deletes are also written to `store`.
    pub fn with_store(store: CatalogStore) -> Self {
        Self {
            index: RwLock::new(Index::default()),
            store: Some(store),
        }
    }

    pub fn store(&self) -> Option<&CatalogStore> {
        self.store.as_ref()
    }

    fn read(&self) -> RwLockReadGuard<'_, Index> {
        self.index.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Index> {
        self.index.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the catalog contents with what `source` produces. Failures
    /// are logged and leave the catalog empty; they are never returned as
    /// errors.
    pub fn load<S: TrackSource>(&self, source: &S) -> LoadOutcome {
        let what = source.describe();
        let harvest = match source.harvest() {
            Ok(Some(h)) => h,
            Ok(None) => {
                tracing::info!("{what}: nothing to load");
                *self.write() = Index::default();
                return LoadOutcome::Empty;
            }
            Err(e) => {
                tracing::error!("{what}: could not load catalog: {e}");
                *self.write() = Index::default();
                return LoadOutcome::Degraded(e.to_string());
            }
        };

        let mut index = Index::default();
        for genre in &harvest.genres {
            index.add_genre(genre);
        }

        let mut loaded = 0usize;
        for track in harvest.tracks {
            let id = track.id.clone();
            let genre = track.genre.clone();
            if index.insert_if_absent(&genre, track, false) {
                loaded += 1;
            } else {
                tracing::debug!("{what}: dropping duplicate id {id}");
            }
        }

        tracing::info!(
            "{what}: loaded {loaded} tracks in {} genres",
            index.genres.len()
        );
        *self.write() = index;

        if loaded == 0 {
            LoadOutcome::Empty
        } else {
            LoadOutcome::Populated(loaded)
        }
    }

    pub fn len(&self) -> usize {
        self.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.read().by_id.contains_key(id)
    }

    pub fn get(&self, id: &TrackId) -> Option<Track> {
        self.read().by_id.get(id).cloned()
    }

    /// Root listing: every track, sorted case-insensitively by title.
    pub fn all_tracks(&self) -> Vec<Track> {
        let mut tracks: Vec<Track> = self.read().by_id.values().cloned().collect();
        tracks.sort_by_cached_key(|t| (t.title.to_lowercase(), t.id.clone()));
        tracks
    }

    /// Known genres in registration order.
    pub fn genres(&self) -> Vec<String> {
        self.read().genres.clone()
    }

    /// Tracks filed under `genre`, newest insert first.
    pub fn genre_tracks(&self, genre: &str) -> Vec<Track> {
        let index = self.read();
        index
            .by_genre
            .get(genre)
            .map(|ids| index.resolve(ids))
            .unwrap_or_default()
    }

    pub fn genre_len(&self, genre: &str) -> usize {
        self.read().by_genre.get(genre).map(Vec::len).unwrap_or(0)
    }

    /// Register a genre, persisting it as a category when a store is attached.
    pub fn add_genre(&self, genre: &str) -> Result<bool, StoreError> {
        if let Some(store) = &self.store {
            store.insert_category(genre)?;
        }
        Ok(self.write().add_genre(genre))
    }

    /// File `track` under `genre`.
    ///
    /// The track is re-keyed the way the store keys it (`hash(genre + source)`),
    /// persisted when a store is attached, then put at the head of the genre
    /// list. If that id is already indexed the in-memory catalog is unchanged.
    ///
    /// The collision check uses the re-keyed id, not `track.id`: a track that
    /// is already indexed under another genre still gets filed here. This
    /// departs from a plain "no-op when the incoming id exists" rule so that
    /// memory matches what a reload of the store produces.
    pub fn insert(&self, genre: &str, track: &Track) -> Result<InsertOutcome, StoreError> {
        let stored = track.stored_as(genre);

        if let Some(store) = &self.store {
            store.insert_music(genre, &stored)?;
        }

        let id = stored.id.clone();
        if self.write().insert_if_absent(genre, stored, true) {
            tracing::debug!("filed {id} under {genre:?}");
            Ok(InsertOutcome::Added(id))
        } else {
            Ok(InsertOutcome::Existing(id))
        }
    }

    /// Remove `track` by source: every matching store entry, and every stored
    /// in-memory track with that source. Tracks from other producers stay.
    /// Returns the number of store entries removed.
    pub fn delete(&self, track: &Track) -> Result<usize, StoreError> {
        let removed = match &self.store {
            Some(store) => store.delete_music(&track.source)?,
            None => 0,
        };

        let mut index = self.write();
        let doomed: Vec<TrackId> = index
            .by_id
            .values()
            .filter(|t| t.origin == Origin::Stored && t.source == track.source)
            .map(|t| t.id.clone())
            .collect();
        for id in &doomed {
            index.by_id.remove(id);
        }
        for list in index.by_genre.values_mut() {
            list.retain(|id| !doomed.contains(id));
        }

        tracing::debug!(
            "deleted source {:?}: {removed} stored entries, {} indexed",
            track.source,
            doomed.len()
        );
        Ok(removed)
    }

    /// Add producer results to memory only. New ids are indexed; every id,
    /// new or not, is appended to `genre` once. Returns how many ids were new.
    pub fn merge(&self, genre: &str, tracks: Vec<Track>) -> usize {
        let mut index = self.write();
        index.add_genre(genre);

        let mut added = 0usize;
        for track in tracks {
            let id = track.id.clone();
            if index.insert_if_absent(genre, track, false) {
                added += 1;
                continue;
            }
            let list = index.by_genre.entry(genre.to_string()).or_default();
            if !list.contains(&id) {
                list.push(id);
            }
        }
        added
    }
}
