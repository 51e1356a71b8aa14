use std::fmt;
use std::time::Duration;

use super::id::genre_source_id;

/// Opaque track identifier. Each producer derives it deterministically from
/// its own fields, so ids from different producers may collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Which producer built a track.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Read from the JSON catalog file.
    Stored,
    /// Found by the local filesystem scan.
    Local,
    /// Returned by the search backend.
    Search,
}

impl Origin {
    pub fn label(self) -> &'static str {
        match self {
            Origin::Stored => "stored",
            Origin::Local => "local",
            Origin::Search => "search",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: Option<String>,
    pub album: String,
    pub genre: String,
    /// File path, URL or other opaque locator the track plays from.
    pub source: String,
    pub duration: Duration,
    pub origin: Origin,
}

impl Track {
    /// Re-key this track the way the JSON store would after a reload: same
    /// metadata, filed under `genre`, with id `hash(genre + source)`.
    pub fn stored_as(&self, genre: &str) -> Track {
        Track {
            id: genre_source_id(genre, &self.source),
            genre: genre.to_string(),
            origin: Origin::Stored,
            ..self.clone()
        }
    }

    /// Whether `source` points at a local file rather than a URL.
    pub fn is_local_file(&self) -> bool {
        !self.source.contains("://")
    }
}
