//! Commands, events and shared state of the playback subsystem.

use std::sync::mpsc::{self, Receiver, SendError, Sender};
use std::sync::{Arc, Mutex};

use crate::locator::Locator;

/// Title published before anything has been played.
pub const IDLE_TITLE: &str = "No track";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlayerState {
    /// No session.
    #[default]
    Idle,
    /// Session created, decoder still loading.
    Preparing,
    Playing,
    Paused,
}

impl PlayerState {
    pub fn label(self) -> &'static str {
        match self {
            PlayerState::Idle => "Idle",
            PlayerState::Preparing => "Loading",
            PlayerState::Playing => "Playing",
            PlayerState::Paused => "Paused",
        }
    }
}

/// Identifies one decoder session. Events carrying an older ticket are stale.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Ticket(u64);

impl Ticket {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCmd {
    /// Play the track at the current playlist position from the start.
    PlayCurrent,
    /// Jump to an index and play it.
    PlayAt(usize),
    /// Look a catalog locator up in the playlist and play it if present.
    Select(Locator),
    TogglePlayback,
    Next,
    /// Swap in a freshly scanned catalog; the current session keeps playing.
    ReplacePlaylist(Vec<Locator>),
    /// Replace the playlist with a single entry and play it.
    OpenExternal(Locator),
    Quit,
}

/// Callbacks from a decoder session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoderEvent {
    Prepared {
        ticket: Ticket,
        /// Title tag re-read from the file while preparing.
        title: Option<String>,
    },
    Failed {
        ticket: Ticket,
        reason: String,
    },
}

/// Everything delivered to the playback thread, in arrival order.
#[derive(Debug)]
pub enum PlayerMsg {
    Cmd(PlayerCmd),
    Event(DecoderEvent),
}

/// Sending half of the playback thread's queue, command side.
#[derive(Clone, Debug)]
pub struct PlayerSender {
    tx: Sender<PlayerMsg>,
}

impl PlayerSender {
    pub fn send(&self, cmd: PlayerCmd) -> Result<(), SendError<PlayerMsg>> {
        self.tx.send(PlayerMsg::Cmd(cmd))
    }

    pub(super) fn raw(&self) -> Sender<PlayerMsg> {
        self.tx.clone()
    }
}

/// Create the playback thread's queue.
pub fn channel() -> (PlayerSender, Receiver<PlayerMsg>) {
    let (tx, rx) = mpsc::channel();
    (PlayerSender { tx }, rx)
}

/// A transient user-facing message. `seq` changes even when the text repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub seq: u64,
    pub text: String,
}

/// Snapshot published by the controller for the UI.
#[derive(Debug, Clone)]
pub struct PlaybackInfo {
    pub state: PlayerState,
    /// Locator bound to the current session, if any.
    pub locator: Option<Locator>,
    /// "Now playing" text; `revision` bumps whenever it changes.
    pub title: String,
    pub revision: u64,
    pub notice: Option<Notice>,
    pub playlist_len: usize,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            state: PlayerState::Idle,
            locator: None,
            title: IDLE_TITLE.to_string(),
            revision: 0,
            notice: None,
            playlist_len: 0,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
