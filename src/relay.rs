//! Action tags and the forwarder that turns them into player commands.
//!
//! Keys in the TUI, MPRIS method calls and `tonearm ctl` all end up here,
//! so a button press behaves the same no matter where it came from.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, warn};

use crate::locator::Locator;
use crate::player::{PlayerCmd, PlayerSender};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    /// (Re)start the track at the current playlist position.
    Play,
    TogglePlayback,
    Next,
}

impl Action {
    pub fn tag(self) -> &'static str {
        match self {
            Action::Play => "PLAY",
            Action::TogglePlayback => "TOGGLE_PLAYBACK",
            Action::Next => "NEXT",
        }
    }

    pub fn command(self) -> PlayerCmd {
        match self {
            Action::Play => PlayerCmd::PlayCurrent,
            Action::TogglePlayback => PlayerCmd::TogglePlayback,
            Action::Next => PlayerCmd::Next,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown action `{0}`")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    /// Accepts `PLAY`, `TOGGLE_PLAYBACK`, `NEXT` in any case, with `-` or `_`,
    /// and with an optional `ACTION_` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_uppercase().replace('-', "_");
        let norm = norm.strip_prefix("ACTION_").unwrap_or(&norm);
        match norm {
            "PLAY" => Ok(Action::Play),
            "TOGGLE_PLAYBACK" | "TOGGLE" => Ok(Action::TogglePlayback),
            "NEXT" => Ok(Action::Next),
            _ => Err(UnknownAction(s.to_string())),
        }
    }
}

/// Stateless forwarder into the player's command channel.
#[derive(Clone)]
pub struct Relay {
    tx: PlayerSender,
}

impl Relay {
    pub fn new(tx: PlayerSender) -> Self {
        Self { tx }
    }

    pub fn deliver(&self, action: Action) {
        debug!(%action, "relaying action");
        self.send(action.command());
    }

    /// Replace the playlist with a single entry parsed from `raw` and play it.
    pub fn open(&self, raw: &str) {
        match Locator::parse(raw) {
            Ok(locator) => self.send(PlayerCmd::OpenExternal(locator)),
            Err(e) => warn!("ignoring external request `{raw}`: {e}"),
        }
    }

    fn send(&self, cmd: PlayerCmd) {
        if self.tx.send(cmd).is_err() {
            warn!("player thread is gone; dropping command");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PlayerMsg, channel};

    #[test]
    fn tags_parse_leniently() {
        assert_eq!("PLAY".parse::<Action>(), Ok(Action::Play));
        assert_eq!("toggle-playback".parse::<Action>(), Ok(Action::TogglePlayback));
        assert_eq!("ACTION_NEXT".parse::<Action>(), Ok(Action::Next));
        assert_eq!(" toggle ".parse::<Action>(), Ok(Action::TogglePlayback));
        assert!("rewind".parse::<Action>().is_err());
    }

    #[test]
    fn unknown_tag_error_names_the_tag() {
        let err = "rewind".parse::<Action>().unwrap_err();
        assert_eq!(err, UnknownAction("rewind".into()));
        assert_eq!(err.to_string(), "unknown action `rewind`");
    }

    #[test]
    fn tag_round_trips_through_from_str() {
        for a in [Action::Play, Action::TogglePlayback, Action::Next] {
            assert_eq!(a.tag().parse::<Action>(), Ok(a));
        }
    }

    #[test]
    fn deliver_sends_the_matching_command() {
        let (tx, rx) = channel();
        let relay = Relay::new(tx);
        relay.deliver(Action::Next);
        relay.deliver(Action::TogglePlayback);
        relay.deliver(Action::Play);

        let got: Vec<PlayerMsg> = rx.try_iter().collect();
        assert!(matches!(got[0], PlayerMsg::Cmd(PlayerCmd::Next)));
        assert!(matches!(got[1], PlayerMsg::Cmd(PlayerCmd::TogglePlayback)));
        assert!(matches!(got[2], PlayerMsg::Cmd(PlayerCmd::PlayCurrent)));
    }

    #[test]
    fn open_parses_and_drops_invalid_locators() {
        let (tx, rx) = channel();
        let relay = Relay::new(tx);
        relay.open("file:///music/a%20b.mp3");
        relay.open("http://radio.example/stream");

        let got: Vec<PlayerMsg> = rx.try_iter().collect();
        assert_eq!(got.len(), 1);
        match &got[0] {
            PlayerMsg::Cmd(PlayerCmd::OpenExternal(l)) => {
                assert_eq!(l.path(), std::path::Path::new("/music/a b.mp3"))
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
