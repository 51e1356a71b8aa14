use std::collections::BTreeSet;
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::*;
use walkdir::WalkDir;

use crate::catalog::{Harvest, Origin, Track, TrackSource, path_id};
use crate::config::LibrarySettings;

const UNKNOWN_GENRE: &str = "Unknown";

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Name of the directory holding `path`, used as the track's genre.
fn genre_of(path: &Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .and_then(|s| s.to_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(UNKNOWN_GENRE)
        .to_string()
}

fn non_empty(v: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Build a `Track` for one audio file. Unreadable tags fall back to the file
/// stem for the title and the directory name for the album.
pub fn read_track(path: &Path) -> Track {
    let genre = genre_of(path);
    let mut title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();
    let mut artist: Option<String> = None;
    let mut album: Option<String> = None;
    let mut duration = Duration::ZERO;

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            duration = tagged.properties().duration();

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = non_empty(tag.title()) {
                    title = v;
                }
                artist = non_empty(tag.artist());
                album = non_empty(tag.album());
            }
        }
        Err(e) => tracing::debug!("no tags for {}: {e}", path.display()),
    }

    Track {
        id: path_id(path),
        title,
        artist,
        album: album.unwrap_or_else(|| genre.clone()),
        genre,
        source: path.display().to_string(),
        duration,
        origin: Origin::Local,
    }
}

/// Scan `dir` for audio files. Entries that cannot be read are skipped.
/// The result is sorted case-insensitively by title.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!("skipping unreadable entry: {e}");
                continue;
            }
        };

        let path = entry.path();
        if path.is_file()
            && (settings.include_hidden || !is_hidden(path))
            && is_audio_file(path, settings)
        {
            tracks.push(read_track(path));
        }
    }

    tracks.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
    tracks
}

/// `TrackSource` over a local music directory.
pub struct LocalLibrary {
    root: PathBuf,
    settings: LibrarySettings,
}

impl LocalLibrary {
    pub fn new(root: impl Into<PathBuf>, settings: LibrarySettings) -> Self {
        Self {
            root: root.into(),
            settings,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TrackSource for LocalLibrary {
    type Error = Infallible;

    fn describe(&self) -> String {
        format!("local library {}", self.root.display())
    }

    fn harvest(&self) -> Result<Option<Harvest>, Infallible> {
        if !self.root.is_dir() {
            tracing::warn!("library root {} is not a directory", self.root.display());
            return Ok(None);
        }

        let tracks = scan(&self.root, &self.settings);
        let genres: BTreeSet<String> = tracks.iter().map(|t| t.genre.clone()).collect();

        Ok(Some(Harvest {
            tracks,
            genres: genres.into_iter().collect(),
        }))
    }
}
