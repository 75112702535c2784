//! The playback state machine.
//!
//! `Controller` owns the playlist, the current position and the single
//! decoder session. It runs on the playback thread and is the only thing
//! that mutates any of them.

use tracing::{debug, info, warn};

use crate::config::{ErrorPolicy, PlaybackSettings};
use crate::locator::Locator;
use crate::notification::{NotificationView, Presenter};
use crate::playlist::Playlist;

use super::backend::{Backend, EventSink, Session};
use super::types::{DecoderEvent, Notice, PlaybackHandle, PlayerCmd, PlayerMsg, PlayerState, Ticket};

pub const NOT_IN_PLAYLIST: &str = "Track not found in playlist";

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub on_error: ErrorPolicy,
    pub unknown_title: String,
    pub paused_prefix: String,
}

impl From<&PlaybackSettings> for ControllerOptions {
    fn from(s: &PlaybackSettings) -> Self {
        Self {
            on_error: s.on_error,
            unknown_title: s.unknown_title.clone(),
            paused_prefix: s.paused_prefix.clone(),
        }
    }
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::from(&PlaybackSettings::default())
    }
}

/// Whether the playback thread should keep running.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Controller<B: Backend> {
    backend: B,
    events: EventSink,
    presenter: Box<dyn Presenter + Send>,
    info: PlaybackHandle,
    options: ControllerOptions,

    playlist: Playlist,
    session: Option<B::Session>,
    /// The track the current session was opened on.
    bound: Option<Locator>,
    ticket: Ticket,
    state: PlayerState,
    title: String,
    failures: usize,
    notice_seq: u64,
}

impl<B: Backend> Controller<B> {
    pub fn new(
        backend: B,
        events: EventSink,
        presenter: Box<dyn Presenter + Send>,
        info: PlaybackHandle,
        options: ControllerOptions,
    ) -> Self {
        let title = info
            .lock()
            .map(|i| i.title.clone())
            .unwrap_or_default();
        Self {
            backend,
            events,
            presenter,
            info,
            options,
            playlist: Playlist::default(),
            session: None,
            bound: None,
            ticket: Ticket::default(),
            state: PlayerState::Idle,
            title,
            failures: 0,
            notice_seq: 0,
        }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn handle(&mut self, msg: PlayerMsg) -> Flow {
        match msg {
            PlayerMsg::Cmd(cmd) => self.command(cmd),
            PlayerMsg::Event(ev) => {
                self.event(ev);
                Flow::Continue
            }
        }
    }

    pub fn command(&mut self, cmd: PlayerCmd) -> Flow {
        debug!(?cmd, state = ?self.state(), "command");
        match cmd {
            PlayerCmd::PlayCurrent => self.play_current(),
            PlayerCmd::PlayAt(index) => self.play(index),
            PlayerCmd::Select(locator) => self.select(&locator),
            PlayerCmd::TogglePlayback => self.toggle_playback(),
            PlayerCmd::Next => self.next(),
            PlayerCmd::ReplacePlaylist(locators) => self.replace_playlist(locators),
            PlayerCmd::OpenExternal(locator) => self.open_external(locator),
            PlayerCmd::Quit => {
                self.shutdown();
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    pub fn event(&mut self, ev: DecoderEvent) {
        match ev {
            DecoderEvent::Prepared { ticket, title } => self.on_prepared(ticket, title),
            DecoderEvent::Failed { ticket, reason } => {
                if self.is_current(ticket) {
                    if let Some(next) = self.fail(&reason) {
                        self.play(next);
                    }
                } else {
                    debug!(?ticket, "ignoring failure from an abandoned session");
                }
            }
        }
    }

    /// Check for natural end of track; called between queue messages.
    pub fn poll(&mut self) {
        let done = self.state == PlayerState::Playing
            && self.session.as_ref().is_some_and(|s| s.finished());
        if done {
            self.on_completion();
        }
    }

    pub fn play(&mut self, mut index: usize) {
        // Synchronous open errors walk the playlist here instead of recursing.
        loop {
            let Some(locator) = self.playlist.get(index).cloned() else {
                warn!(index, len = self.playlist.len(), "play ignored: index out of range");
                return;
            };
            self.playlist.set_index(index);

            // The previous decoder is gone before the next one is created.
            self.release_session();
            self.ticket = self.ticket.next();
            self.bound = Some(locator.clone());
            self.set_state(PlayerState::Preparing, Some(locator.clone()));

            info!(%locator, index, ticket = ?self.ticket(), "preparing");
            match self.backend.open(&locator, self.ticket, &self.events) {
                Ok(session) => {
                    self.session = Some(session);
                    return;
                }
                Err(e) => match self.fail(&e.to_string()) {
                    Some(next) => index = next,
                    None => return,
                },
            }
        }
    }

    pub fn play_current(&mut self) {
        if !self.playlist.is_empty() {
            self.play(self.playlist.index());
        }
    }

    pub fn toggle_playback(&mut self) {
        let Some(session) = self.session.as_mut() else {
            debug!("toggle ignored: no session");
            return;
        };

        match self.state {
            PlayerState::Playing => {
                session.pause();
                self.set_state(PlayerState::Paused, None);
                let label = format!("{}{}", self.options.paused_prefix, self.title);
                self.publish_title(label);
            }
            PlayerState::Paused => {
                session.start();
                self.set_state(PlayerState::Playing, None);
                self.publish_title(self.title.clone());
            }
            PlayerState::Idle | PlayerState::Preparing => {
                debug!(state = ?self.state, "toggle ignored: not started yet");
                return;
            }
        }
        self.present();
    }

    pub fn next(&mut self) {
        if let Some(index) = self.playlist.advance() {
            self.play(index);
        }
    }

    pub fn select(&mut self, locator: &Locator) {
        match self.playlist.position(locator) {
            Some(index) => self.play(index),
            None => {
                info!(%locator, "selected track is not in the playlist");
                self.notice(NOT_IN_PLAYLIST);
            }
        }
    }

    pub fn replace_playlist(&mut self, locators: Vec<Locator>) {
        self.install(Playlist::new(locators));
    }

    pub fn open_external(&mut self, locator: Locator) {
        info!(%locator, "external request");
        self.install(Playlist::single(locator));
        self.play(0);
    }

    pub fn shutdown(&mut self) {
        self.release_session();
        self.set_state(PlayerState::Idle, None);
        self.presenter.withdraw();
    }

    fn install(&mut self, playlist: Playlist) {
        self.playlist = playlist;
        self.failures = 0;
        info!(len = self.playlist.len(), "playlist replaced");
        if let Ok(mut info) = self.info.lock() {
            info.playlist_len = self.playlist.len();
        }
    }

    fn on_prepared(&mut self, ticket: Ticket, title: Option<String>) {
        if !self.is_current(ticket) {
            debug!(?ticket, "ignoring preparation of an abandoned session");
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        session.start();
        self.failures = 0;
        self.title = title.unwrap_or_else(|| self.options.unknown_title.clone());
        self.set_state(PlayerState::Playing, None);
        self.publish_title(self.title.clone());
        self.present();
    }

    fn on_completion(&mut self) {
        debug!("track completed");
        self.next();
    }

    /// Record a failure of the bound track. Returns the index to try next
    /// under the skip policy, or `None` after going Idle.
    ///
    /// The playlist may have been replaced while the track was loading, so
    /// the name and the skip position come from the bound locator.
    fn fail(&mut self, reason: &str) -> Option<usize> {
        let bound = self.bound.clone();
        let name = bound.as_ref().map(Locator::short_name).unwrap_or_default();
        warn!(track = %name, reason, "playback failed");

        self.release_session();
        self.failures += 1;
        self.title = format!("Cannot play: {name}");
        self.publish_title(self.title.clone());

        let retry = self.options.on_error == ErrorPolicy::Skip
            && self.failures < self.playlist.len();
        if retry {
            match bound.and_then(|l| self.playlist.position(&l)) {
                Some(index) => {
                    self.playlist.set_index(index);
                    if let Some(next) = self.playlist.advance() {
                        return Some(next);
                    }
                }
                // Not in the new list: its current entry has not been tried.
                None => return Some(self.playlist.index()),
            }
        }
        self.failures = 0;
        self.set_state(PlayerState::Idle, None);
        self.present();
        None
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket == self.ticket && self.has_session()
    }

    fn release_session(&mut self) {
        if let Some(session) = self.session.take() {
            drop(session);
        }
        self.bound = None;
    }

    fn set_state(&mut self, state: PlayerState, locator: Option<Locator>) {
        self.state = state;
        if let Ok(mut info) = self.info.lock() {
            info.state = state;
            match state {
                PlayerState::Idle => info.locator = None,
                _ => {
                    if locator.is_some() {
                        info.locator = locator;
                    }
                }
            }
        }
    }

    fn publish_title(&mut self, title: String) {
        if let Ok(mut info) = self.info.lock() {
            if info.title != title {
                info.title = title;
                info.revision += 1;
            }
        }
    }

    fn notice(&mut self, text: &str) {
        self.notice_seq += 1;
        if let Ok(mut info) = self.info.lock() {
            info.notice = Some(Notice {
                seq: self.notice_seq,
                text: text.to_string(),
            });
        }
    }

    fn present(&mut self) {
        let track = match self.state {
            PlayerState::Idle => None,
            _ => self.bound.clone().map(|l| {
                let index = self
                    .playlist
                    .position(&l)
                    .unwrap_or_else(|| self.playlist.index());
                (index, l)
            }),
        };
        let view = NotificationView::build(self.state, &self.title, track);
        self.presenter.present(&view);
    }
}
