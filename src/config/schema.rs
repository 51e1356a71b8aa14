use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/musictube/config.toml` or `~/.config/musictube/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `MUSICTUBE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub library: LibrarySettings,
    pub search: SearchSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

/// Which producer the catalog is loaded from at start-up.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogSourceSetting {
    #[serde(alias = "remote", alias = "remote-json")]
    Json,
    #[serde(alias = "files", alias = "filesystem")]
    Local,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub source: CatalogSourceSetting,
    /// Location of the JSON catalog. Defaults to
    /// `$XDG_DATA_HOME/musictube/musictube.json`.
    pub json_path: Option<PathBuf>,
    /// Genre that records played tracks, newest first.
    pub recent_genre: String,
    /// Genre the favorite action files tracks under.
    pub favorite_genre: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            source: CatalogSourceSetting::Json,
            json_path: None,
            recent_genre: "New and recently played songs".to_string(),
            favorite_genre: "My favorite".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Directory scanned when `catalog.source = "local"`. Defaults to `~/Music`.
    pub root: Option<PathBuf>,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root: None,
            extensions: vec![
                "mp3".into(),
                "flac".into(),
                "wav".into(),
                "ogg".into(),
                "m4a".into(),
            ],
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Result cap per query. The video search API allows at most 50.
    pub max_results: u32,
    /// Content category results are filtered to ("10" is Music).
    pub category_id: String,
    /// Query used to refill the recent genre when it runs short.
    pub recent_query: String,
    /// Directory of recorded video-list responses, one `<query>.json` per query.
    pub recorded_dir: Option<PathBuf>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: 45,
            category_id: "10".to_string(),
            recent_query: "New Songs".to_string(),
            recorded_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ musictube ~ ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// One of `error`, `warn`, `info`, `debug`, `trace`.
    pub level: String,
    /// Log file used while the terminal browser owns the screen.
    /// Defaults to `musictube.log` next to the JSON catalog.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
