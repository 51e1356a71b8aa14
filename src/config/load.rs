use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `MUSICTUBE__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("MUSICTUBE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=50).contains(&self.search.max_results) {
            return Err("search.max_results must be between 1 and 50".to_string());
        }
        if self.catalog.recent_genre.trim().is_empty() {
            return Err("catalog.recent_genre must not be empty".to_string());
        }
        if self.catalog.favorite_genre.trim().is_empty() {
            return Err("catalog.favorite_genre must not be empty".to_string());
        }
        Ok(())
    }

    /// The JSON catalog path, configured or default.
    pub fn catalog_path(&self) -> PathBuf {
        self.catalog
            .json_path
            .clone()
            .or_else(default_catalog_path)
            .unwrap_or_else(|| PathBuf::from("musictube.json"))
    }

    /// The music directory, configured or `~/Music`.
    pub fn library_root(&self) -> PathBuf {
        self.library
            .root
            .clone()
            .or_else(|| env::var_os("HOME").map(|h| PathBuf::from(h).join("Music")))
            .unwrap_or_else(|| PathBuf::from("Music"))
    }

    /// The log file used by the terminal browser.
    pub fn log_path(&self) -> PathBuf {
        self.log.file.clone().unwrap_or_else(|| {
            self.catalog_path()
                .with_file_name("musictube.log")
        })
    }
}

/// Resolve the config path from `MUSICTUBE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("MUSICTUBE_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/musictube/config.toml`
/// or `~/.config/musictube/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("musictube").join("config.toml"))
}

/// Compute the default catalog path under `$XDG_DATA_HOME/musictube/musictube.json`
/// or `~/.local/share/musictube/musictube.json`.
pub fn default_catalog_path() -> Option<PathBuf> {
    let data_home = if let Some(xdg) = env::var_os("XDG_DATA_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("share"))
    };

    data_home.map(|d| d.join("musictube").join("musictube.json"))
}
