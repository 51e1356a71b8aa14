use super::*;
use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

fn t(title: &str, genre: &str, source: &str) -> Track {
    Track {
        id: genre_source_id(genre, source),
        title: title.into(),
        artist: None,
        album: "Album".into(),
        genre: genre.into(),
        source: source.into(),
        duration: Duration::from_secs(60),
        origin: Origin::Search,
    }
}

fn titles(tracks: &[Track]) -> Vec<String> {
    tracks.iter().map(|t| t.title.clone()).collect()
}

#[test]
fn load_missing_file_is_empty() {
    let dir = tempdir().unwrap();
    let store = CatalogStore::new(dir.path().join("nope").join("musictube.json"));
    let catalog = Catalog::new();

    assert_eq!(catalog.load(&store), LoadOutcome::Empty);
    assert!(catalog.all_tracks().is_empty());
    assert!(catalog.genres().is_empty());
}

#[test]
fn load_blank_and_bare_object_files_are_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("musictube.json");
    let store = CatalogStore::new(&path);
    let catalog = Catalog::new();

    fs::write(&path, "  \n").unwrap();
    assert_eq!(catalog.load(&store), LoadOutcome::Empty);
    assert!(catalog.genres().is_empty());

    fs::write(&path, "{}").unwrap();
    assert_eq!(catalog.load(&store), LoadOutcome::Empty);
    assert!(catalog.all_tracks().is_empty());
    assert!(catalog.genres().is_empty());
}

#[test]
fn load_malformed_file_degrades_to_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("musictube.json");
    fs::write(&path, r#"{"music": [ {"title": 3 "#).unwrap();

    let catalog = Catalog::new();
    let outcome = catalog.load(&CatalogStore::new(&path));
    assert!(matches!(outcome, LoadOutcome::Degraded(_)));
    assert!(catalog.is_empty());
    assert!(catalog.genres().is_empty());
}

#[test]
fn load_reads_music_and_categories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("musictube.json");
    fs::write(
        &path,
        r#"{
  "music": [
    {"title": "banana", "album": "A", "genre": "Jazz", "source": "s1", "duration": 100},
    {"title": "Apple", "album": "A", "genre": "Rock", "source": "s2", "duration": 200},
    {"title": "cherry", "album": "A", "genre": "Jazz", "source": "s3", "duration": 300}
  ],
  "categories": ["New and recently played songs", "My favorite"]
}"#,
    )
    .unwrap();

    let catalog = Catalog::new();
    assert_eq!(catalog.load(&CatalogStore::new(&path)), LoadOutcome::Populated(3));

    assert_eq!(titles(&catalog.all_tracks()), vec!["Apple", "banana", "cherry"]);
    assert_eq!(
        catalog.genres(),
        vec!["New and recently played songs", "My favorite", "Jazz", "Rock"]
    );
    // Later entries in the file are newer.
    assert_eq!(titles(&catalog.genre_tracks("Jazz")), vec!["cherry", "banana"]);

    let apple = catalog.get(&genre_source_id("Rock", "s2")).unwrap();
    assert_eq!(apple.duration, Duration::from_millis(200_000));
    assert_eq!(apple.origin, Origin::Stored);
}

#[test]
fn root_listing_sorts_case_insensitively() {
    let catalog = Catalog::new();
    catalog.merge(
        "Mix",
        vec![t("banana", "Mix", "b"), t("Apple", "Mix", "a"), t("cherry", "Mix", "c")],
    );
    assert_eq!(titles(&catalog.all_tracks()), vec!["Apple", "banana", "cherry"]);
}

#[test]
fn insert_files_track_under_genre_and_id_map() {
    let catalog = Catalog::new();
    let track = t("Song", "Search_x", "https://youtu.be/1");

    let outcome = catalog.insert("My favorite", &track).unwrap();
    let InsertOutcome::Added(id) = outcome else {
        panic!("expected a new entry, got {outcome:?}");
    };

    assert_eq!(id, genre_source_id("My favorite", "https://youtu.be/1"));
    let stored = catalog.get(&id).unwrap();
    assert_eq!(stored.genre, "My favorite");
    assert_eq!(stored.origin, Origin::Stored);
    assert_eq!(titles(&catalog.genre_tracks("My favorite")), vec!["Song"]);
    assert!(catalog.genres().contains(&"My favorite".to_string()));
}

#[test]
fn insert_puts_newest_first() {
    let catalog = Catalog::new();
    catalog.insert("Recent", &t("one", "x", "1")).unwrap();
    catalog.insert("Recent", &t("two", "x", "2")).unwrap();
    catalog.insert("Recent", &t("three", "x", "3")).unwrap();

    assert_eq!(
        titles(&catalog.genre_tracks("Recent")),
        vec!["three", "two", "one"]
    );
}

#[test]
fn reload_keeps_genre_lists_newest_first() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("musictube.json");
    let catalog = Catalog::with_store(CatalogStore::new(&path));
    catalog.insert("Recent", &t("one", "x", "1")).unwrap();
    catalog.insert("Recent", &t("two", "x", "2")).unwrap();
    catalog.insert("Recent", &t("three", "x", "3")).unwrap();
    let before = titles(&catalog.genre_tracks("Recent"));

    let reloaded = Catalog::new();
    assert_eq!(reloaded.load(&CatalogStore::new(&path)), LoadOutcome::Populated(3));
    assert_eq!(titles(&reloaded.genre_tracks("Recent")), before);
    assert_eq!(before, vec!["three", "two", "one"]);
}

#[test]
fn insert_with_taken_id_keeps_first_metadata() {
    let catalog = Catalog::new();
    catalog.insert("Fav", &t("first", "x", "same")).unwrap();
    let outcome = catalog.insert("Fav", &t("second", "x", "same")).unwrap();

    assert!(matches!(outcome, InsertOutcome::Existing(_)));
    assert_eq!(catalog.len(), 1);
    assert_eq!(titles(&catalog.genre_tracks("Fav")), vec!["first"]);
}

#[test]
fn insert_persists_to_store_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sub").join("musictube.json");
    let catalog = Catalog::with_store(CatalogStore::new(&path));

    let track = t("Song", "Search_x", "https://youtu.be/1");
    catalog.insert("Fav", &track).unwrap();
    catalog.insert("Fav", &track).unwrap();

    let entries = CatalogStore::new(&path).read().unwrap().unwrap().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].genre, "Fav");
    assert_eq!(entries[0].source, "https://youtu.be/1");
    assert_eq!(entries[0].duration, 60);

    // A reload yields the same id the insert reported.
    let reloaded = Catalog::new();
    reloaded.load(&CatalogStore::new(&path));
    assert!(reloaded.contains(&genre_source_id("Fav", "https://youtu.be/1")));
}

#[test]
fn delete_removes_matching_sources_and_is_idempotent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("musictube.json");
    let catalog = Catalog::with_store(CatalogStore::new(&path));

    let keep = t("keep", "x", "keep-src");
    let gone = t("gone", "x", "gone-src");
    catalog.insert("Fav", &keep).unwrap();
    catalog.insert("Fav", &gone).unwrap();
    catalog.insert("Recent", &gone).unwrap();

    assert_eq!(catalog.delete(&gone).unwrap(), 2);
    let after_once = CatalogStore::new(&path).read().unwrap().unwrap();
    let titles_once: Vec<String> = after_once.entries().into_iter().map(|m| m.title).collect();
    assert_eq!(titles_once, vec!["keep"]);
    assert_eq!(titles(&catalog.genre_tracks("Fav")), vec!["keep"]);
    assert!(catalog.genre_tracks("Recent").is_empty());

    assert_eq!(catalog.delete(&gone).unwrap(), 0);
    let after_twice = CatalogStore::new(&path).read().unwrap().unwrap();
    assert_eq!(after_once, after_twice);
    assert_eq!(catalog.len(), 1);
}

#[test]
fn delete_leaves_other_producers_alone() {
    let catalog = Catalog::new();
    let found = t("found", "Search_q", "https://youtu.be/z");
    catalog.merge("Search_q", vec![found.clone()]);
    catalog.insert("Fav", &found).unwrap();

    catalog.delete(&found).unwrap();
    assert!(catalog.contains(&found.id));
    assert!(catalog.genre_tracks("Fav").is_empty());
}

#[test]
fn merge_appends_and_never_duplicates() {
    let catalog = Catalog::new();
    let a = t("a", "G", "1");
    let b = t("b", "G", "2");

    assert_eq!(catalog.merge("G", vec![a.clone(), b.clone()]), 2);
    assert_eq!(catalog.merge("G", vec![b.clone(), a.clone()]), 0);
    assert_eq!(titles(&catalog.genre_tracks("G")), vec!["a", "b"]);

    // A known id merged into a second genre is listed there too.
    assert_eq!(catalog.merge("Other", vec![a]), 0);
    assert_eq!(titles(&catalog.genre_tracks("Other")), vec!["a"]);
    assert_eq!(catalog.len(), 2);
}

#[test]
fn concurrent_producers_with_same_id_leave_one_entry() {
    let catalog = Arc::new(Catalog::new());
    let mut handles = Vec::new();
    for n in 0..8 {
        let catalog = Arc::clone(&catalog);
        handles.push(thread::spawn(move || {
            let mut track = t(&format!("writer {n}"), "G", "shared");
            track.id = TrackId::from("collide");
            catalog.merge("G", vec![track]);
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.genre_tracks("G").len(), 1);
}

#[test]
fn store_preserves_unknown_keys_on_rewrite() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("musictube.json");
    fs::write(
        &path,
        r#"{"music": [{"title": "t", "album": "a", "genre": "g", "source": "s", "duration": 5, "image": "cover.jpg"}], "categories": [], "version": 2}"#,
    )
    .unwrap();

    let store = CatalogStore::new(&path);
    assert!(store.insert_category("Rock").unwrap());
    assert!(!store.insert_category("Rock").unwrap());

    let file = store.read().unwrap().unwrap();
    assert_eq!(file.categories, vec!["Rock"]);
    assert_eq!(file.extra.get("version"), Some(&serde_json::json!(2)));
    assert_eq!(
        file.entries()[0].extra.get("image"),
        Some(&serde_json::json!("cover.jpg"))
    );
}

#[test]
fn store_refuses_to_overwrite_malformed_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("musictube.json");
    fs::write(&path, "not json").unwrap();

    let store = CatalogStore::new(&path);
    assert!(matches!(
        store.insert_category("Rock"),
        Err(StoreError::Parse { .. })
    ));
    assert_eq!(fs::read_to_string(&path).unwrap(), "not json");
}

#[test]
fn bad_entries_are_skipped_and_writes_still_work() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("musictube.json");
    fs::write(
        &path,
        r#"{
  "music": [
    {"title": "good", "album": "A", "genre": "Jazz", "source": "s1", "duration": 100},
    {"title": "fraction", "album": "A", "genre": "Jazz", "source": "s2", "duration": 12.5},
    {"title": "text", "genre": "Jazz", "source": "s3", "duration": "42"},
    {"title": "no source", "genre": "Jazz", "duration": 5},
    {"title": "bad text", "genre": "Jazz", "source": "s4", "duration": "soon"},
    7
  ],
  "categories": ["Jazz"]
}"#,
    )
    .unwrap();

    let catalog = Catalog::with_store(CatalogStore::new(&path));
    let outcome = catalog.load(catalog.store().unwrap());
    assert_eq!(outcome, LoadOutcome::Populated(3));
    assert_eq!(
        catalog.get(&genre_source_id("Jazz", "s2")).unwrap().duration,
        Duration::from_secs(12)
    );
    assert_eq!(
        catalog.get(&genre_source_id("Jazz", "s3")).unwrap().duration,
        Duration::from_secs(42)
    );

    // The store stays writable, and unreadable entries are carried through.
    catalog.insert("Fav", &t("new", "x", "s9")).unwrap();
    let file = CatalogStore::new(&path).read().unwrap().unwrap();
    assert_eq!(file.music.len(), 7);
    assert_eq!(file.entries().len(), 4);
    assert_eq!(catalog.delete(&t("good", "Jazz", "s1")).unwrap(), 1);
}
