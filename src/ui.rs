//! UI rendering helpers for the terminal catalog browser.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, InputMode, Row, View};
use crate::catalog::Track;
use crate::config::UiSettings;

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter/l", "open/play"),
    ("h/backspace", "back"),
    ("space", "pause"),
    ("s", "stop"),
    ("a", "all tracks"),
    ("f", "favorite"),
    ("d", "delete saved"),
    ("/", "search"),
    ("esc", "cancel search"),
    ("r", "refresh"),
    ("K", "metadata"),
    ("q", "quit"),
];

fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn track_line(track: &Track) -> String {
    let mut line = match track.artist.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(a) => format!("{a} - {}", track.title),
        None => track.title.clone(),
    };
    if !track.duration.is_zero() {
        line.push_str(&format!("  [{}]", format_mmss(track.duration)));
    }
    line
}

fn row_line(row: &Row) -> String {
    match row {
        Row::Genre { name, count } => format!("{name} ({count})"),
        Row::Track(t) => track_line(t),
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn status_text(app: &App) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!(" VIEW: {}", app.view.title()));
    parts.push(format!("{} tracks", app.catalog().len()));

    if app.mode == InputMode::Search {
        parts.push(format!("SEARCH: {}_", app.query));
    } else if let Some(q) = &app.searching {
        parts.push(format!("Searching {q:?}..."));
    }

    if let Some(ref h) = app.playback_handle {
        if let Ok(info) = h.lock() {
            match &info.title {
                Some(title) => {
                    let state = if info.playing { "Playing" } else { "Paused" };
                    parts.push(format!("Song: {title} [{}]", format_mmss(info.elapsed)));
                    parts.push(state.to_string());
                }
                None => parts.push("Stopped".to_string()),
            }
            if let Some(err) = &info.error {
                parts.push(err.clone());
            }
        }
    }

    if let Some(msg) = &app.status {
        parts.push(msg.clone());
    }

    parts.join(" • ")
}

/// Visible window `[start, end)` of `total` rows that keeps `selected`
/// centered when possible.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" musictube ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status_par = Paragraph::new(status_text(app))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Only build ListItems for the visible window.
    let list_area = chunks[2];
    let (start, end) = visible_window(
        app.rows.len(),
        list_area.height.saturating_sub(2) as usize,
        app.selected,
    );
    let items: Vec<ListItem> = app.rows[start..end]
        .iter()
        .map(|r| ListItem::new(row_line(r)))
        .collect();

    let title = match &app.view {
        View::Genres => " genres ".to_string(),
        other => format!(" {} ", other.title()),
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ratatui::widgets::ListState::default();
    if !app.rows.is_empty() {
        state.select(Some(app.selected - start));
    }
    frame.render_stateful_widget(list, list_area, &mut state);

    if app.metadata_window {
        let popup_area = centered_rect_sized(72, 10, list_area);
        frame.render_widget(Clear, popup_area);

        let meta = match app.selected_track() {
            Some(track) => format!(
                "Title: {}\nArtist: {}\nAlbum: {}\nGenre: {}\nDuration: {}\nSource: {}\nFrom: {} ({})",
                track.title,
                track.artist.as_deref().unwrap_or("-"),
                track.album,
                track.genre,
                format_mmss(track.duration),
                track.source,
                track.origin.label(),
                track.id,
            ),
            None => "No track selected".to_string(),
        };
        let meta_paragraph = Paragraph::new(meta)
            .block(
                Block::default()
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    })
                    .borders(Borders::ALL)
                    .title(" metadata (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(meta_paragraph, popup_area);
    }

    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[3]);
}
