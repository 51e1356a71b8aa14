use super::load::{default_catalog_path, default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_musictube_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("MUSICTUBE_CONFIG_PATH", "/tmp/musictube-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/musictube-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("musictube")
            .join("config.toml")
    );
}

#[test]
fn default_catalog_path_falls_back_to_local_share() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_DATA_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_catalog_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/share/musictube/musictube.json")
    );
}

#[test]
fn defaults_cover_search_limits_and_builtin_genres() {
    let s = Settings::default();
    assert_eq!(s.search.max_results, 45);
    assert_eq!(s.search.category_id, "10");
    assert_eq!(s.catalog.source, CatalogSourceSetting::Json);
    assert_eq!(s.catalog.recent_genre, "New and recently played songs");
    assert_eq!(s.catalog.favorite_genre, "My favorite");
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_out_of_range_max_results() {
    let mut s = Settings::default();
    s.search.max_results = 0;
    assert!(s.validate().is_err());
    s.search.max_results = 51;
    assert!(s.validate().is_err());
    s.search.max_results = 50;
    assert!(s.validate().is_ok());
    s.catalog.favorite_genre = "  ".into();
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file_and_parse_source_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[catalog]
source = "filesystem"
json_path = "/tmp/catalog.json"
favorite_genre = "Loved"

[library]
root = "/srv/music"
extensions = ["mp3"]
recursive = false
include_hidden = false

[search]
max_results = 10
recent_query = "Top Hits"

[ui]
header_text = "hello"

[log]
level = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("MUSICTUBE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("MUSICTUBE__SEARCH__MAX_RESULTS");

    let s = Settings::load().unwrap();
    assert_eq!(s.catalog.source, CatalogSourceSetting::Local);
    assert_eq!(s.catalog_path(), std::path::PathBuf::from("/tmp/catalog.json"));
    assert_eq!(s.catalog.favorite_genre, "Loved");
    assert_eq!(s.catalog.recent_genre, "New and recently played songs");
    assert_eq!(s.library_root(), std::path::PathBuf::from("/srv/music"));
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(!s.library.include_hidden);
    assert_eq!(s.search.max_results, 10);
    assert_eq!(s.search.recent_query, "Top Hits");
    assert_eq!(s.search.category_id, "10");
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.log.level, "debug");
    assert_eq!(s.log_path(), std::path::PathBuf::from("/tmp/musictube.log"));
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[search]
max_results = 20
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("MUSICTUBE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("MUSICTUBE__SEARCH__MAX_RESULTS", "5");

    let s = Settings::load().unwrap();
    assert_eq!(s.search.max_results, 5);
}
