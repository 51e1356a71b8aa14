//! Browser model: what the terminal front end is looking at.
//!
//! `App` keeps a navigation stack over the catalog (genre list, one genre,
//! or every track), the cursor, the search prompt and a status line. It
//! reads and writes the catalog only through `Catalog`'s accessors.

use std::sync::Arc;

use crate::audio::{AudioError, PlaybackHandle};
use crate::catalog::{Catalog, InsertOutcome, Track};
use crate::config::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Root: the genre list.
    Genres,
    /// Tracks filed under one genre, newest first.
    Genre(String),
    /// Every track, sorted by title.
    AllTracks,
}

impl View {
    pub fn title(&self) -> String {
        match self {
            View::Genres => "Genres".to_string(),
            View::Genre(g) => g.clone(),
            View::AllTracks => "All tracks".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Genre { name: String, count: usize },
    Track(Track),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputMode {
    Browse,
    Search,
}

/// What the runtime should do after `App::open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenAction {
    Nothing,
    /// A genre was opened.
    Opened,
    /// The recent genre was opened but is short; refill it with this query.
    RefreshRecent { query: String, genre: String },
    /// A track was chosen for playback.
    Play(Track),
}

pub struct App {
    catalog: Arc<Catalog>,
    pub view: View,
    pub rows: Vec<Row>,
    pub selected: usize,
    back_stack: Vec<(View, usize)>,

    pub mode: InputMode,
    pub query: String,
    /// Query of the search currently in flight.
    pub searching: Option<String>,
    pub status: Option<String>,
    pub metadata_window: bool,

    pub playback_handle: Option<PlaybackHandle>,

    recent_genre: String,
    favorite_genre: String,
    recent_query: String,
    recent_threshold: usize,
}

impl App {
    pub fn new(catalog: Arc<Catalog>, settings: &Settings) -> Self {
        let mut app = Self {
            catalog,
            view: View::Genres,
            rows: Vec::new(),
            selected: 0,
            back_stack: Vec::new(),
            mode: InputMode::Browse,
            query: String::new(),
            searching: None,
            status: None,
            metadata_window: false,
            playback_handle: None,
            recent_genre: settings.catalog.recent_genre.clone(),
            favorite_genre: settings.catalog.favorite_genre.clone(),
            recent_query: settings.search.recent_query.clone(),
            recent_threshold: settings.search.max_results as usize,
        };
        app.refresh();
        app
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    pub fn set_playback_handle(&mut self, handle: PlaybackHandle) {
        self.playback_handle = Some(handle);
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    /// Rebuild `rows` for the current view, keeping the cursor in range.
    pub fn refresh(&mut self) {
        self.rows = match &self.view {
            View::Genres => self
                .catalog
                .genres()
                .into_iter()
                .map(|name| {
                    let count = self.catalog.genre_len(&name);
                    Row::Genre { name, count }
                })
                .collect(),
            View::Genre(g) => self
                .catalog
                .genre_tracks(g)
                .into_iter()
                .map(Row::Track)
                .collect(),
            View::AllTracks => self
                .catalog
                .all_tracks()
                .into_iter()
                .map(Row::Track)
                .collect(),
        };
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
    }

    pub fn selected_row(&self) -> Option<&Row> {
        self.rows.get(self.selected)
    }

    pub fn selected_track(&self) -> Option<&Track> {
        match self.selected_row() {
            Some(Row::Track(t)) => Some(t),
            _ => None,
        }
    }

    /// Move selection down by one (wraps to top).
    pub fn next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.rows.len();
    }

    /// Move selection up by one (wraps to bottom).
    pub fn prev(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.selected = if self.selected == 0 {
            self.rows.len() - 1
        } else {
            self.selected - 1
        };
    }

    pub fn top(&mut self) {
        self.selected = 0;
    }

    pub fn bottom(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    fn push_view(&mut self, view: View) {
        if self.view == view {
            self.refresh();
            return;
        }
        let prev = std::mem::replace(&mut self.view, view);
        self.back_stack.push((prev, self.selected));
        self.selected = 0;
        self.refresh();
    }

    /// Show `genre`, pushing the current view on the back stack.
    pub fn navigate_to(&mut self, genre: &str) {
        self.push_view(View::Genre(genre.to_string()));
    }

    pub fn show_all(&mut self) {
        self.push_view(View::AllTracks);
    }

    /// Return to the previous view. Returns `false` at the root.
    pub fn back(&mut self) -> bool {
        match self.back_stack.pop() {
            Some((view, selected)) => {
                self.view = view;
                self.selected = selected;
                self.refresh();
                true
            }
            None => false,
        }
    }

    /// Act on the selected row: open a genre or pick a track.
    pub fn open(&mut self) -> OpenAction {
        match self.selected_row().cloned() {
            Some(Row::Genre { name, count }) => {
                self.navigate_to(&name);
                if name == self.recent_genre && count < self.recent_threshold {
                    OpenAction::RefreshRecent {
                        query: self.recent_query.clone(),
                        genre: name,
                    }
                } else {
                    OpenAction::Opened
                }
            }
            Some(Row::Track(t)) => OpenAction::Play(t),
            None => OpenAction::Nothing,
        }
    }

    /// File a played track under the recent genre.
    pub fn record_play(&mut self, track: &Track) {
        let genre = self.recent_genre.clone();
        if let Err(e) = self.catalog.insert(&genre, track) {
            tracing::warn!("could not record play of {}: {e}", track.id);
            self.set_status(format!("could not save recent track: {e}"));
        }
        self.refresh();
    }

    /// Report how a play request went. Tracks that started playing, and
    /// remote tracks that cannot be played here, are recorded as recent;
    /// files that failed to open or decode are not.
    pub fn finish_play(&mut self, track: &Track, result: Result<(), AudioError>) {
        match result {
            Ok(()) => self.status = None,
            Err(AudioError::NotLocal(source)) => {
                self.set_status(format!("{source} is not a local file; playback skipped"));
            }
            Err(e) => {
                tracing::warn!("playback failed: {e}");
                self.set_status(format!("playback failed: {e}"));
                return;
            }
        }
        self.record_play(track);
    }

    /// File the selected track under the favorite genre.
    pub fn favorite_selected(&mut self) {
        let Some(track) = self.selected_track().cloned() else {
            return;
        };
        let genre = self.favorite_genre.clone();
        match self.catalog.insert(&genre, &track) {
            Ok(InsertOutcome::Added(_)) => {
                self.set_status(format!("added {:?} to {genre}", track.title));
            }
            Ok(InsertOutcome::Existing(_)) => {
                self.set_status(format!("{:?} is already in {genre}", track.title));
            }
            Err(e) => {
                tracing::warn!("favorite failed: {e}");
                self.set_status(format!("could not save favorite: {e}"));
            }
        }
        self.refresh();
    }

    /// Remove the selected track from the stored catalog.
    pub fn delete_selected(&mut self) {
        let Some(track) = self.selected_track().cloned() else {
            return;
        };
        match self.catalog.delete(&track) {
            Ok(n) => self.set_status(format!("removed {n} saved entries for {:?}", track.title)),
            Err(e) => {
                tracing::warn!("delete failed: {e}");
                self.set_status(format!("could not delete: {e}"));
            }
        }
        self.refresh();
    }

    pub fn enter_search(&mut self) {
        self.mode = InputMode::Search;
        self.query.clear();
    }

    pub fn cancel_search_prompt(&mut self) {
        self.mode = InputMode::Browse;
        self.query.clear();
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn pop_query_char(&mut self) {
        self.query.pop();
    }

    /// Leave the prompt and hand back the trimmed query, if any.
    pub fn submit_search(&mut self) -> Option<String> {
        self.mode = InputMode::Browse;
        let q = self.query.trim().to_string();
        self.query.clear();
        if q.is_empty() { None } else { Some(q) }
    }
}
