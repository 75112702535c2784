//! Application model: the track list, the cursor and transient messages.
//!
//! `App` never touches playback directly. It reads the snapshot the player
//! publishes and the runtime turns key presses into player commands.

use std::time::{Duration, Instant};

use crate::library::Track;
use crate::locator::Locator;
use crate::player::{PlaybackHandle, PlaybackInfo};

/// A message shown over the list until `until`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub text: String,
    pub until: Instant,
}

/// The main application model.
pub struct App {
    pub tracks: Vec<Track>,
    pub selected: usize,
    pub playback_handle: Option<PlaybackHandle>,
    pub current_dir: Option<String>,

    toast: Option<Toast>,
    toast_duration: Duration,
    last_notice: u64,
}

impl App {
    /// Create a new `App` with the provided list of `tracks`.
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            selected: 0,
            playback_handle: None,
            current_dir: None,
            toast: None,
            toast_duration: Duration::from_secs(3),
            last_notice: 0,
        }
    }

    /// Replace the whole list. The cursor returns to the top.
    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.selected = 0;
    }

    /// Locators in list order, ready to become the player's playlist.
    pub fn locators(&self) -> Vec<Locator> {
        self.tracks.iter().map(|t| t.locator.clone()).collect()
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    pub fn set_toast_duration(&mut self, d: Duration) {
        self.toast_duration = d;
    }

    /// Move selection down, wrapping to the top.
    pub fn next(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.tracks.len();
    }

    /// Move selection up, wrapping to the bottom.
    pub fn prev(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        self.selected = match self.selected {
            0 => self.tracks.len() - 1,
            n => n - 1,
        };
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        self.selected = self.tracks.len().saturating_sub(1);
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.tracks.get(self.selected)
    }

    pub fn selected_locator(&self) -> Option<Locator> {
        self.selected_track().map(|t| t.locator.clone())
    }

    /// Copy of the latest published playback snapshot.
    pub fn playback(&self) -> Option<PlaybackInfo> {
        let h = self.playback_handle.as_ref()?;
        h.lock().ok().map(|i| i.clone())
    }

    /// Row of the track bound to the current session, if it is in the list.
    pub fn now_playing_index(&self) -> Option<usize> {
        let info = self.playback()?;
        let locator = info.locator?;
        self.tracks.iter().position(|t| t.locator == locator)
    }

    pub fn show_toast(&mut self, text: impl Into<String>, now: Instant) {
        self.toast = Some(Toast {
            text: text.into(),
            until: now + self.toast_duration,
        });
    }

    /// Turn a new player notice into a toast. Returns true when one was shown.
    pub fn sync_notice(&mut self, now: Instant) -> bool {
        let notice = self.playback().and_then(|i| i.notice);
        match notice {
            Some(n) if n.seq != self.last_notice => {
                self.last_notice = n.seq;
                self.show_toast(n.text, now);
                true
            }
            _ => false,
        }
    }

    /// Drop the toast once it has expired. Returns true if it was removed.
    pub fn expire_toast(&mut self, now: Instant) -> bool {
        match &self.toast {
            Some(t) if now >= t.until => {
                self.toast = None;
                true
            }
            _ => false,
        }
    }

    pub fn toast(&self) -> Option<&str> {
        self.toast.as_ref().map(|t| t.text.as_str())
    }
}
