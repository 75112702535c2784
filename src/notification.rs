//! The persistent "now playing" notification.
//!
//! The controller rebuilds a `NotificationView` from scratch on every state
//! change and hands it to a `Presenter`; nothing is patched in place.

use crate::locator::Locator;
use crate::player::PlayerState;
use crate::relay::Action;

pub const APP_NAME: &str = "tonearm";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    pub action: Action,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub summary: &'static str,
    /// Current track title (without any "paused" decoration).
    pub body: String,
    pub state: PlayerState,
    pub playing: bool,
    /// Sticky while audio is playing.
    pub ongoing: bool,
    pub actions: [NotificationAction; 2],
    /// Playlist position and locator of the bound track.
    pub track: Option<(usize, Locator)>,
}

impl NotificationView {
    pub fn build(state: PlayerState, title: &str, track: Option<(usize, Locator)>) -> Self {
        let playing = state == PlayerState::Playing;
        let toggle = NotificationAction {
            action: Action::TogglePlayback,
            label: if playing { "Pause" } else { "Play" },
        };
        let next = NotificationAction {
            action: Action::Next,
            label: "Next",
        };

        Self {
            summary: APP_NAME,
            body: title.to_string(),
            state,
            playing,
            ongoing: playing,
            actions: [toggle, next],
            track,
        }
    }
}

/// Something that can show the notification (MPRIS, a test recorder, ...).
pub trait Presenter {
    fn present(&mut self, view: &NotificationView);
    fn withdraw(&mut self);
}

/// Presenter used when no notification surface is available.
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&mut self, _view: &NotificationView) {}
    fn withdraw(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playing_view_offers_pause_and_is_ongoing() {
        let v = NotificationView::build(
            PlayerState::Playing,
            "Song",
            Some((3, Locator::from_path("/m/song.mp3"))),
        );
        assert_eq!(v.summary, APP_NAME);
        assert_eq!(v.body, "Song");
        assert!(v.playing && v.ongoing);
        assert_eq!(v.actions[0].label, "Pause");
        assert_eq!(v.actions[0].action, Action::TogglePlayback);
        assert_eq!(v.actions[1].action, Action::Next);
        assert_eq!(v.track.as_ref().map(|t| t.0), Some(3));
    }

    #[test]
    fn paused_view_offers_play_and_can_be_dismissed() {
        let v = NotificationView::build(PlayerState::Paused, "Song", None);
        assert!(!v.playing && !v.ongoing);
        assert_eq!(v.actions[0].label, "Play");
        assert_eq!(v.body, "Song");
    }
}
