use std::sync::Arc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::catalog::{Catalog, LoadOutcome};
use crate::config;

mod event_loop;
mod settings;
mod startup;

pub use settings::load_settings;
pub use startup::{ensure_builtin_categories, init_logging, open_catalog, search_backend};

/// Run the terminal browser until the user quits.
pub fn browse(
    settings: &config::Settings,
    catalog: Arc<Catalog>,
    outcome: &LoadOutcome,
    runtime: &tokio::runtime::Runtime,
) -> Result<(), Box<dyn std::error::Error>> {
    let audio_player = AudioPlayer::new();
    let backend = Arc::new(search_backend(settings));

    let mut app = App::new(catalog, settings);
    app.set_playback_handle(audio_player.playback_handle());
    if let LoadOutcome::Degraded(reason) = outcome {
        app.set_status(format!("catalog unavailable: {reason}"));
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let services = event_loop::Services {
        settings,
        audio: &audio_player,
        backend: &backend,
        runtime: runtime.handle(),
    };
    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(&mut terminal, &services, &mut app, &mut state);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
