use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::catalog::{Catalog, CatalogStore, LoadOutcome};
use crate::config::{self, CatalogSourceSetting, LogSettings};
use crate::library::LocalLibrary;
use crate::search::RecordedBackend;

/// Install the global `tracing` subscriber. With `file` set, logs are
/// appended there instead of stderr so they stay out of the TUI.
pub fn init_logging(log: &LogSettings, file: Option<&Path>) {
    let level = log
        .level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    let builder = tracing_subscriber::fmt().with_max_level(level);

    let opened = file.map(|path| {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        OpenOptions::new().create(true).append(true).open(path)
    });

    let result = match opened {
        Some(Ok(f)) => builder.with_ansi(false).with_writer(Mutex::new(f)).try_init(),
        Some(Err(e)) => {
            eprintln!("musictube: cannot open log file, logging to stderr: {e}");
            builder.with_writer(std::io::stderr).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    if let Err(e) = result {
        eprintln!("musictube: logging already initialised: {e}");
    }
}

/// Make sure the built-in genres exist in the store.
pub fn ensure_builtin_categories(store: &CatalogStore, settings: &config::Settings) {
    for name in [&settings.catalog.recent_genre, &settings.catalog.favorite_genre] {
        match store.insert_category(name) {
            Ok(true) => tracing::info!("created category {name:?}"),
            Ok(false) => {}
            Err(e) => tracing::warn!("could not create category {name:?}: {e}"),
        }
    }
}

/// Build the catalog from the configured source. The JSON store is attached
/// either way so favorites and plays are persisted.
pub fn open_catalog(settings: &config::Settings) -> (Arc<Catalog>, LoadOutcome) {
    let store = CatalogStore::new(settings.catalog_path());

    match settings.catalog.source {
        CatalogSourceSetting::Json => {
            ensure_builtin_categories(&store, settings);
            let catalog = Catalog::with_store(store);
            let outcome = match catalog.store() {
                Some(store) => catalog.load(store),
                None => LoadOutcome::Empty,
            };
            (Arc::new(catalog), outcome)
        }
        CatalogSourceSetting::Local => {
            let library = LocalLibrary::new(settings.library_root(), settings.library.clone());
            let catalog = Catalog::with_store(store);
            let outcome = catalog.load(&library);
            (Arc::new(catalog), outcome)
        }
    }
}

/// Search backend for this configuration. Recorded responses live in
/// `search.recorded_dir`, or `responses/` next to the catalog file.
pub fn search_backend(settings: &config::Settings) -> RecordedBackend {
    let dir = settings.search.recorded_dir.clone().unwrap_or_else(|| {
        let catalog = settings.catalog_path();
        catalog
            .parent()
            .map(|p| p.join("responses"))
            .unwrap_or_else(|| "responses".into())
    });
    RecordedBackend::new(dir)
}
