use super::*;
use crate::catalog::{Catalog, Origin, genre_source_id};
use crate::config::SearchSettings;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn record(id: &str, title: &str, duration: Option<&str>) -> VideoRecord {
    VideoRecord {
        id: id.into(),
        title: title.into(),
        duration: duration.map(str::to_string),
        category_id: Some("10".into()),
    }
}

struct FixedBackend(Vec<VideoRecord>);

impl SearchBackend for FixedBackend {
    async fn search(&self, _request: &SearchRequest) -> Result<Vec<VideoRecord>, SearchError> {
        Ok(self.0.clone())
    }
}

struct DeniedBackend;

impl SearchBackend for DeniedBackend {
    async fn search(&self, _request: &SearchRequest) -> Result<Vec<VideoRecord>, SearchError> {
        Err(SearchError::Unauthorized("no account selected".into()))
    }
}

struct StalledBackend;

impl SearchBackend for StalledBackend {
    async fn search(&self, _request: &SearchRequest) -> Result<Vec<VideoRecord>, SearchError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(vec![record("late", "Late", None)])
    }
}

#[test]
fn request_maps_records_to_tracks() {
    let request = SearchRequest::new("lofi", &SearchSettings::default());
    let track = request.to_track(&record("abc123", "Beats", Some("PT2M58S")));

    assert_eq!(track.title, "Beats");
    assert_eq!(track.album, "lofi");
    assert_eq!(track.genre, "Search_lofi");
    assert_eq!(track.source, "https://youtu.be/abc123");
    assert_eq!(track.duration, Duration::from_millis(178_000));
    assert_eq!(track.id, genre_source_id("Search_lofi", "https://youtu.be/abc123"));
    assert_eq!(track.origin, Origin::Search);
    assert!(!track.is_local_file());
}

#[test]
fn request_genre_override_and_bad_duration() {
    let request =
        SearchRequest::new("New Songs", &SearchSettings::default()).with_genre("Recent");
    let track = request.to_track(&record("x", "X", Some("soon")));

    assert_eq!(request.max_results, 45);
    assert_eq!(request.category_id, "10");
    assert_eq!(track.genre, "Recent");
    assert_eq!(track.duration, Duration::ZERO);
}

#[test]
fn request_accepts_oversized_duration() {
    let request = SearchRequest::new("long", &SearchSettings::default());
    let track = request.to_track(&record("big", "Big", Some("PT99999999999999999S")));
    assert_eq!(track.duration, Duration::from_secs(99_999_999_999_999_999));
}

#[test]
fn query_slug_flattens_punctuation() {
    assert_eq!(query_slug("New Songs"), "new-songs");
    assert_eq!(query_slug("  AC/DC -- live!  "), "ac-dc-live");
}

#[tokio::test]
async fn run_search_merges_results_under_target_genre() {
    let catalog = Catalog::new();
    let backend = FixedBackend(vec![
        record("1", "One", Some("PT1M")),
        record("2", "Two", None),
    ]);
    let request = SearchRequest::new("jazz", &SearchSettings::default());

    let summary = run_search(&backend, &request, &catalog).await.unwrap();
    assert_eq!(summary.genre, "Search_jazz");
    assert_eq!(summary.found, 2);
    assert_eq!(summary.added, 2);
    assert_eq!(catalog.genre_tracks("Search_jazz").len(), 2);
    assert!(catalog.genres().contains(&"Search_jazz".to_string()));

    // Repeating the query adds nothing new.
    let again = run_search(&backend, &request, &catalog).await.unwrap();
    assert_eq!(again.added, 0);
    assert_eq!(catalog.len(), 2);
}

#[tokio::test]
async fn failed_search_leaves_catalog_untouched() {
    let catalog = Arc::new(Catalog::new());
    let request = SearchRequest::new("jazz", &SearchSettings::default());

    let task = SearchTask::spawn(Arc::new(DeniedBackend), request, Arc::clone(&catalog));
    assert!(matches!(task.join().await, Err(SearchError::Unauthorized(_))));
    assert!(catalog.is_empty());
    assert!(catalog.genres().is_empty());
}

#[tokio::test]
async fn cancelled_search_yields_cancelled() {
    let catalog = Arc::new(Catalog::new());
    let request = SearchRequest::new("slow", &SearchSettings::default());

    let task = SearchTask::spawn(Arc::new(StalledBackend), request, Arc::clone(&catalog));
    assert_eq!(task.genre(), "Search_slow");
    task.cancel();

    assert!(matches!(task.join().await, Err(SearchError::Cancelled)));
    assert!(catalog.is_empty());
}

#[tokio::test]
async fn recorded_backend_filters_category_and_caps_results() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("new-songs.json"),
        r#"{
  "kind": "youtube#videoListResponse",
  "items": [
    {"id": "a", "snippet": {"title": "A", "categoryId": "10"}, "contentDetails": {"duration": "PT3M"}},
    {"id": "b", "snippet": {"title": "B", "categoryId": "20"}, "contentDetails": {"duration": "PT1M"}},
    {"id": "c", "snippet": {"title": "C", "categoryId": "10"}},
    {"id": "d", "snippet": {"title": "D", "categoryId": "10"}, "contentDetails": {"duration": "PT4S"}}
  ]
}"#,
    )
    .unwrap();

    let backend = RecordedBackend::new(dir.path());
    let mut request = SearchRequest::new("New Songs", &SearchSettings::default());
    request.max_results = 2;

    let records = backend.search(&request).await.unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert_eq!(records[0].duration.as_deref(), Some("PT3M"));
    assert_eq!(records[1].duration, None);
}

#[tokio::test]
async fn recorded_backend_reports_missing_responses() {
    let dir = tempdir().unwrap();
    let request = SearchRequest::new("nothing", &SearchSettings::default());

    let missing_query = RecordedBackend::new(dir.path()).search(&request).await;
    assert!(matches!(missing_query, Err(SearchError::Network(_))));

    let missing_dir = RecordedBackend::new(dir.path().join("gone"))
        .search(&request)
        .await;
    assert!(matches!(missing_dir, Err(SearchError::Unavailable(_))));
}
