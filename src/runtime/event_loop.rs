use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::config;
use crate::library::scan;
use crate::player::{PlayerCmd, PlayerSender};
use crate::relay::{Action, Relay};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// What the loop should do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Rescan,
    Quit,
}

/// Main terminal event loop: handles input and drawing. Playback runs on the
/// player thread; the loop only sends commands and reads its snapshot.
/// Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    dir: &Path,
    app: &mut App,
    player: &PlayerSender,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let relay = Relay::new(player.clone());

    loop {
        let now = Instant::now();
        app.sync_notice(now);
        app.expire_toast(now);

        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key_event(key, app, player, &relay, state) {
                    KeyOutcome::Continue => {}
                    KeyOutcome::Rescan => rescan(dir, settings, app, player),
                    KeyOutcome::Quit => break,
                }
            }
        }
    }

    Ok(())
}

/// Re-run the catalog query and hand the new list to the player.
pub fn rescan(dir: &Path, settings: &config::Settings, app: &mut App, player: &PlayerSender) {
    let tracks = scan(dir, &settings.library);
    info!(count = tracks.len(), dir = %dir.display(), "catalog reloaded");
    app.set_tracks(tracks);
    send(player, PlayerCmd::ReplacePlaylist(app.locators()));
}

fn send(player: &PlayerSender, cmd: PlayerCmd) {
    if player.send(cmd).is_err() {
        warn!("player thread is gone; dropping command");
    }
}

pub fn handle_key_event(
    key: KeyEvent,
    app: &mut App,
    player: &PlayerSender,
    relay: &Relay,
    state: &mut EventLoopState,
) -> KeyOutcome {
    // Any key other than a second `g` cancels the prefix.
    let was_pending_gg = std::mem::take(&mut state.pending_gg);

    match key.code {
        KeyCode::Char('q') => return KeyOutcome::Quit,
        KeyCode::Char('g') => {
            if was_pending_gg {
                app.first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.last(),
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => {
            if let Some(locator) = app.selected_locator() {
                send(player, PlayerCmd::Select(locator));
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => relay.deliver(Action::TogglePlayback),
        KeyCode::Char('l') | KeyCode::Char('n') => relay.deliver(Action::Next),
        KeyCode::Char('R') => return KeyOutcome::Rescan,
        _ => {}
    }

    KeyOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::Track;
    use crate::locator::Locator;
    use crate::player::{PlayerMsg, channel};
    use crossterm::event::KeyModifiers;
    use std::sync::mpsc::Receiver;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

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

    fn commands(rx: &Receiver<PlayerMsg>) -> Vec<PlayerCmd> {
        rx.try_iter()
            .filter_map(|m| match m {
                PlayerMsg::Cmd(c) => Some(c),
                PlayerMsg::Event(_) => None,
            })
            .collect()
    }

    #[test]
    fn enter_selects_the_row_under_the_cursor() {
        let (tx, rx) = channel();
        let relay = Relay::new(tx.clone());
        let mut app = App::new(vec![track(1, "A"), track(2, "B")]);
        let mut state = EventLoopState::default();

        handle_key_event(key(KeyCode::Char('j')), &mut app, &tx, &relay, &mut state);
        handle_key_event(key(KeyCode::Enter), &mut app, &tx, &relay, &mut state);

        assert_eq!(
            commands(&rx),
            vec![PlayerCmd::Select(Locator::from_path("/music/B.mp3"))]
        );
    }

    #[test]
    fn enter_on_empty_list_sends_nothing() {
        let (tx, rx) = channel();
        let relay = Relay::new(tx.clone());
        let mut app = App::new(Vec::new());
        let mut state = EventLoopState::default();

        handle_key_event(key(KeyCode::Enter), &mut app, &tx, &relay, &mut state);
        assert!(commands(&rx).is_empty());
    }

    #[test]
    fn playback_keys_go_through_the_relay() {
        let (tx, rx) = channel();
        let relay = Relay::new(tx.clone());
        let mut app = App::new(vec![track(1, "A")]);
        let mut state = EventLoopState::default();

        for c in [' ', 'p', 'l', 'n'] {
            handle_key_event(key(KeyCode::Char(c)), &mut app, &tx, &relay, &mut state);
        }
        assert_eq!(
            commands(&rx),
            vec![
                PlayerCmd::TogglePlayback,
                PlayerCmd::TogglePlayback,
                PlayerCmd::Next,
                PlayerCmd::Next,
            ]
        );
    }

    #[test]
    fn gg_needs_two_presses_and_other_keys_cancel_it() {
        let (tx, _rx) = channel();
        let relay = Relay::new(tx.clone());
        let mut app = App::new(vec![track(1, "A"), track(2, "B"), track(3, "C")]);
        let mut state = EventLoopState::default();

        handle_key_event(key(KeyCode::Char('G')), &mut app, &tx, &relay, &mut state);
        assert_eq!(app.selected, 2);

        handle_key_event(key(KeyCode::Char('g')), &mut app, &tx, &relay, &mut state);
        assert_eq!(app.selected, 2);
        handle_key_event(key(KeyCode::Char('x')), &mut app, &tx, &relay, &mut state);
        handle_key_event(key(KeyCode::Char('g')), &mut app, &tx, &relay, &mut state);
        assert_eq!(app.selected, 2);
        handle_key_event(key(KeyCode::Char('g')), &mut app, &tx, &relay, &mut state);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn quit_and_rescan_are_reported_to_the_loop() {
        let (tx, _rx) = channel();
        let relay = Relay::new(tx.clone());
        let mut app = App::new(Vec::new());
        let mut state = EventLoopState::default();

        assert_eq!(
            handle_key_event(key(KeyCode::Char('R')), &mut app, &tx, &relay, &mut state),
            KeyOutcome::Rescan
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('q')), &mut app, &tx, &relay, &mut state),
            KeyOutcome::Quit
        );
    }

    #[test]
    fn rescan_replaces_list_and_playlist() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one.mp3"), b"not really audio").unwrap();
        std::fs::write(dir.path().join("two.flac"), b"not really audio").unwrap();

        let (tx, rx) = channel();
        let mut app = App::new(vec![track(1, "Old")]);
        rescan(dir.path(), &config::Settings::default(), &mut app, &tx);

        assert_eq!(app.tracks.len(), 2);
        match commands(&rx).as_slice() {
            [PlayerCmd::ReplacePlaylist(locators)] => assert_eq!(locators.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }
}
