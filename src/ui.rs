//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::config::UiSettings;
use crate::library::Track;
use crate::notification::APP_NAME;
use crate::player::{IDLE_TITLE, PlaybackInfo};

pub const EMPTY_HINT: &str = "No tracks found";

const CONTROLS: [(&str, &str); 7] = [
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter", "play selected song"),
    ("space/p", "play/pause"),
    ("l/n", "next song"),
    ("R", "rescan"),
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

fn row_text(track: &Track) -> String {
    match track.duration {
        Some(d) => format!("{:>3}  {} [{}]", track.id, track.display(), format_mmss(d)),
        None => format!("{:>3}  {}", track.id, track.display()),
    }
}

/// Status line: state word, published title, playlist size and directory.
fn status_text(app: &App, info: Option<&PlaybackInfo>) -> String {
    let mut parts: Vec<String> = Vec::new();

    match info {
        Some(info) => {
            parts.push(format!(" {}", info.state.label()));
            parts.push(format!("Song: {}", info.title));
            let album = app
                .now_playing_index()
                .and_then(|i| app.tracks[i].album.as_deref());
            if let Some(album) = album {
                parts.push(format!("Album: {album}"));
            }
            parts.push(format!("Playlist: {}", info.playlist_len));
        }
        None => {
            parts.push(format!(" Song: {IDLE_TITLE}"));
        }
    }

    if let Some(dir) = &app.current_dir {
        parts.push(format!("Dir: {dir}"));
    }

    parts.join(" • ")
}

/// Window of rows to render so the selected row stays roughly centered.
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

/// A small box along the bottom edge of `r`.
fn toast_rect(text_len: usize, r: Rect) -> Rect {
    let width = (text_len as u16 + 4).min(r.width.saturating_sub(2)).max(10);
    let height = 3.min(r.height);
    Rect {
        x: r.x + (r.width.saturating_sub(width) / 2),
        y: r.y + r.height.saturating_sub(height + 1),
        width,
        height,
    }
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let info = app.playback();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {APP_NAME} "))
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status_par = Paragraph::new(status_text(app, info.as_ref()))
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

    // Main list
    let list_block = Block::default().borders(Borders::ALL).title(" tracks ");
    if !app.has_tracks() {
        let hint = Paragraph::new(EMPTY_HINT)
            .alignment(Alignment::Center)
            .italic()
            .block(list_block);
        frame.render_widget(hint, chunks[2]);
    } else {
        let list_height = chunks[2].height.saturating_sub(2) as usize;
        let (start, end) = visible_window(app.tracks.len(), list_height, app.selected);
        let playing = app.now_playing_index();

        // Only build ListItems for the visible window.
        let visible_items: Vec<ListItem> = app.tracks[start..end]
            .iter()
            .enumerate()
            .map(|(offset, track)| {
                let item = ListItem::new(row_text(track));
                if Some(start + offset) == playing {
                    item.style(Style::default().add_modifier(Modifier::BOLD))
                } else {
                    item
                }
            })
            .collect();

        let list = List::new(visible_items)
            .block(list_block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(app.selected - start));
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    // Transient message over the bottom of the list.
    if let Some(text) = app.toast() {
        let area = toast_rect(text.chars().count(), chunks[2]);
        frame.render_widget(Clear, area);
        let toast = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(toast, area);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::Locator;
    use crate::player::PlayerState;
    use ratatui::{Terminal, backend::TestBackend};
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    fn track(id: u64, title: &str) -> Track {
        Track {
            id,
            title: title.into(),
            locator: Locator::from_path(format!("/music/{title}.mp3")),
            artist: None,
            album: None,
            duration: None,
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|f| draw(f, app, &UiSettings::default()))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn window_keeps_selection_visible() {
        assert_eq!(visible_window(5, 10, 4), (0, 5));
        assert_eq!(visible_window(100, 10, 0), (0, 10));
        assert_eq!(visible_window(100, 10, 50), (45, 55));
        assert_eq!(visible_window(100, 10, 99), (90, 100));
    }

    #[test]
    fn rows_show_id_and_duration() {
        let mut t = track(7, "Seven");
        assert_eq!(row_text(&t), "  7  Seven");
        t.duration = Some(Duration::from_secs(125));
        assert_eq!(row_text(&t), "  7  Seven [02:05]");
    }

    #[test]
    fn empty_catalog_shows_hint() {
        let app = App::new(Vec::new());
        assert!(render(&app).contains(EMPTY_HINT));
    }

    #[test]
    fn rows_status_and_toast_are_rendered() {
        let mut app = App::new(vec![track(1, "Alpha"), track(2, "Beta")]);
        let info = Arc::new(Mutex::new(PlaybackInfo::default()));
        {
            let mut i = info.lock().unwrap();
            i.state = PlayerState::Paused;
            i.title = "Paused: Beta".into();
        }
        app.set_playback_handle(info);
        app.show_toast("Track not found in playlist", Instant::now());

        let screen = render(&app);
        assert!(screen.contains("Alpha"));
        assert!(screen.contains("Beta"));
        assert!(screen.contains("Song: Paused: Beta"));
        assert!(screen.contains("Paused"));
        assert!(screen.contains("Track not found in playlist"));
    }
}
