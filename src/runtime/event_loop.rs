use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::runtime::Handle;

use crate::app::{App, InputMode, OpenAction};
use crate::audio::{AudioCmd, AudioPlayer};
use crate::config;
use crate::search::{SearchBackend, SearchError, SearchRequest, SearchTask};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Search running in the background, at most one at a time.
    pub search: Option<SearchTask>,
}

/// Everything the loop drives besides the app itself.
pub struct Services<'a, B> {
    pub settings: &'a config::Settings,
    pub audio: &'a AudioPlayer,
    pub backend: &'a Arc<B>,
    pub runtime: &'a Handle,
}

/// Main terminal event loop: handles input, UI drawing and collects finished
/// searches. Returns `Ok(())` when shutdown is requested.
pub fn run<B: SearchBackend>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    services: &Services<'_, B>,
    app: &mut App,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        if state.search.as_ref().is_some_and(SearchTask::is_finished) {
            if let Some(task) = state.search.take() {
                let result = services.runtime.block_on(task.join());
                finish_search(app, result);
            }
        }

        terminal.draw(|f| ui::draw(f, app, &services.settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, services, app, state) {
                    break;
                }
            }
        }
    }

    if let Some(task) = state.search.take() {
        task.cancel();
    }
    Ok(())
}

fn finish_search(app: &mut App, result: Result<crate::search::SearchSummary, SearchError>) {
    app.searching = None;
    match result {
        Ok(summary) => {
            app.navigate_to(&summary.genre);
            app.set_status(format!(
                "{} results for {:?} ({} new)",
                summary.found, summary.query, summary.added
            ));
        }
        Err(SearchError::Cancelled) => app.set_status("search cancelled"),
        Err(e) => {
            tracing::warn!("search failed: {e}");
            app.set_status(format!("search failed: {e}"));
        }
    }
}

/// Start a search, abandoning any still in flight.
fn start_search<B: SearchBackend>(
    services: &Services<'_, B>,
    app: &mut App,
    state: &mut EventLoopState,
    request: SearchRequest,
) {
    if let Some(previous) = state.search.take() {
        tracing::debug!("abandoning search {:?}", previous.query());
        previous.cancel();
    }
    app.searching = Some(request.query.clone());
    app.status = None;
    state.search = Some(SearchTask::spawn_on(
        services.runtime,
        Arc::clone(services.backend),
        request,
        Arc::clone(app.catalog()),
    ));
}

/// Returns `true` when the app should quit.
fn handle_key_event<B: SearchBackend>(
    key: KeyEvent,
    services: &Services<'_, B>,
    app: &mut App,
    state: &mut EventLoopState,
) -> bool {
    if app.mode == InputMode::Search {
        state.pending_gg = false;
        match key.code {
            KeyCode::Esc => app.cancel_search_prompt(),
            KeyCode::Backspace => app.pop_query_char(),
            KeyCode::Enter => {
                if let Some(query) = app.submit_search() {
                    let request = SearchRequest::new(query, &services.settings.search);
                    start_search(services, app, state, request);
                }
            }
            KeyCode::Char(c) if !c.is_control() => app.push_query_char(c),
            _ => {}
        }
        return false;
    }

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => {
            services.audio.quit();
            return true;
        }
        KeyCode::Esc => {
            if let Some(task) = state.search.as_ref() {
                task.cancel();
            } else {
                app.metadata_window = false;
            }
        }
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Char('g') => {
            if state.pending_gg {
                app.top();
                state.pending_gg = false;
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.bottom(),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => match app.open() {
            OpenAction::Play(track) => {
                let result = services.audio.play(&track);
                app.finish_play(&track, result);
            }
            OpenAction::RefreshRecent { query, genre } => {
                let request =
                    SearchRequest::new(query, &services.settings.search).with_genre(genre);
                start_search(services, app, state, request);
            }
            OpenAction::Opened | OpenAction::Nothing => {}
        },
        KeyCode::Char('h') | KeyCode::Backspace | KeyCode::Left => {
            app.back();
        }
        KeyCode::Char(' ') => {
            let _ = services.audio.send(AudioCmd::TogglePause);
        }
        KeyCode::Char('s') => {
            let _ = services.audio.send(AudioCmd::Stop);
        }
        KeyCode::Char('a') => app.show_all(),
        KeyCode::Char('f') => app.favorite_selected(),
        KeyCode::Char('d') => app.delete_selected(),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('/') => app.enter_search(),
        KeyCode::Char('K') => app.toggle_metadata_window(),
        _ => {}
    }

    false
}
