//! JSON catalog file: `{"music": [...], "categories": [...]}`.
//!
//! Every mutation is a read-modify-write of the whole file, serialized by an
//! internal lock. Keys this crate does not know about are carried through
//! rewrites untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, de};
use thiserror::Error;

use super::id::genre_source_id;
use super::index::{Harvest, TrackSource};
use super::model::{Origin, Track};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed catalog {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// On-disk catalog document.
///
/// `music` entries stay raw JSON so one bad entry cannot spoil the rest;
/// `entries` converts them one at a time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub music: Vec<serde_json::Value>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CatalogFile {
    /// Well-formed `music` entries in file order. Entries that do not
    /// describe a track are logged and skipped.
    pub fn entries(&self) -> Vec<StoredTrack> {
        self.music
            .iter()
            .enumerate()
            .filter_map(|(n, raw)| match StoredTrack::deserialize(raw) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("skipping catalog entry {n}: {e}");
                    None
                }
            })
            .collect()
    }
}

fn entry_field<'a>(raw: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    raw.get(key).and_then(serde_json::Value::as_str)
}

/// One `music` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTrack {
    pub title: String,
    #[serde(default)]
    pub album: String,
    pub genre: String,
    pub source: String,
    /// Whole seconds. Fractional and numeric-string values are truncated.
    #[serde(default, deserialize_with = "whole_seconds")]
    pub duration: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn whole_seconds<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        Whole(u64),
        Fraction(f64),
        Text(String),
    }

    let truncate = |f: f64| if f.is_finite() && f > 0.0 { f as u64 } else { 0 };
    match Option::<Seconds>::deserialize(d)? {
        None => Ok(0),
        Some(Seconds::Whole(n)) => Ok(n),
        Some(Seconds::Fraction(f)) => Ok(truncate(f)),
        Some(Seconds::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(truncate)
            .map_err(|_| de::Error::custom(format!("invalid duration {s:?}"))),
    }
}

impl StoredTrack {
    /// Build the entry written when `track` is filed under `genre`.
    /// Sub-second precision is truncated.
    pub fn from_track(genre: &str, track: &Track) -> Self {
        Self {
            title: track.title.clone(),
            album: track.album.clone(),
            genre: genre.to_string(),
            source: track.source.clone(),
            duration: track.duration.as_secs(),
            artist: track.artist.clone(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn to_track(&self) -> Track {
        Track {
            id: genre_source_id(&self.genre, &self.source),
            title: self.title.clone(),
            artist: self.artist.clone(),
            album: self.album.clone(),
            genre: self.genre.clone(),
            source: self.source.clone(),
            duration: Duration::from_secs(self.duration),
            origin: Origin::Stored,
        }
    }
}

/// Handle on the JSON catalog file.
#[derive(Debug)]
pub struct CatalogStore {
    path: PathBuf,
    io_lock: Mutex<()>,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the catalog. A missing or blank file is `Ok(None)`; anything
    /// unreadable or malformed is an error.
    pub fn read(&self) -> Result<Option<CatalogFile>, StoreError> {
        let _guard = self.io_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.read_unlocked()
    }

    fn read_unlocked(&self) -> Result<Option<CatalogFile>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if text.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    fn write_unlocked(&self, file: &CatalogFile) -> Result<(), StoreError> {
        let io_err = |source: io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let json = serde_json::to_string_pretty(file).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(io_err)
    }

    /// Apply `f` to the current document and write it back when `f` reports a
    /// change. A malformed file is left alone rather than overwritten.
    fn update<R>(
        &self,
        f: impl FnOnce(&mut CatalogFile) -> (R, bool),
    ) -> Result<R, StoreError> {
        let _guard = self.io_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = self.read_unlocked()?.unwrap_or_default();
        let (result, changed) = f(&mut file);
        if changed {
            self.write_unlocked(&file)?;
        }
        Ok(result)
    }

    /// Append a category. Returns `false` when it was already present.
    pub fn insert_category(&self, name: &str) -> Result<bool, StoreError> {
        self.update(|file| {
            if file.categories.iter().any(|c| c == name) {
                (false, false)
            } else {
                file.categories.push(name.to_string());
                (true, true)
            }
        })
    }

    /// Append `track` under `genre`. Returns `false` when an entry with the
    /// same genre and source already exists.
    pub fn insert_music(&self, genre: &str, track: &Track) -> Result<bool, StoreError> {
        let entry = serde_json::to_value(StoredTrack::from_track(genre, track)).map_err(|source| {
            StoreError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;

        self.update(|file| {
            let exists = file.music.iter().any(|m| {
                entry_field(m, "genre") == Some(genre)
                    && entry_field(m, "source") == Some(track.source.as_str())
            });
            if exists {
                (false, false)
            } else {
                file.music.push(entry);
                (true, true)
            }
        })
    }

    /// Remove every entry whose source equals `source`. Returns how many
    /// entries were removed.
    pub fn delete_music(&self, source: &str) -> Result<usize, StoreError> {
        self.update(|file| {
            let before = file.music.len();
            file.music.retain(|m| entry_field(m, "source") != Some(source));
            let removed = before - file.music.len();
            (removed, removed > 0)
        })
    }
}

impl TrackSource for CatalogStore {
    type Error = StoreError;

    fn describe(&self) -> String {
        format!("json catalog {}", self.path.display())
    }

    fn harvest(&self) -> Result<Option<Harvest>, StoreError> {
        let Some(file) = self.read()? else {
            return Ok(None);
        };

        // The file is append-only, so reverse it to list newest first.
        Ok(Some(Harvest {
            tracks: file.entries().iter().rev().map(StoredTrack::to_track).collect(),
            genres: file.categories,
        }))
    }
}
