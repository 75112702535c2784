//! Command line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::relay::Action;

#[derive(Parser, Debug)]
#[command(name = "tonearm")]
#[command(about = "Terminal audio player for a local music folder")]
#[command(version)]
pub struct Cli {
    /// Music directory to scan (defaults to `library.music_dir`, then the working dir)
    pub dir: Option<PathBuf>,

    /// Play this file (path or file:// URI) instead of starting idle
    #[arg(long, value_name = "LOCATOR")]
    pub open: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a button press to a running instance
    Ctl {
        #[command(subcommand)]
        request: CtlRequest,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum CtlRequest {
    /// Restart the current track
    Play,
    /// Pause or resume
    TogglePlayback,
    /// Skip to the next track
    Next,
    /// Replace the playlist with one file and play it
    Open {
        #[arg(value_name = "LOCATOR")]
        locator: String,
    },
    /// Deliver a raw action tag (PLAY, TOGGLE_PLAYBACK, NEXT)
    Action {
        #[arg(value_enum)]
        tag: ActionTag,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionTag {
    Play,
    TogglePlayback,
    Next,
}

impl From<ActionTag> for Action {
    fn from(t: ActionTag) -> Self {
        match t {
            ActionTag::Play => Action::Play,
            ActionTag::TogglePlayback => Action::TogglePlayback,
            ActionTag::Next => Action::Next,
        }
    }
}

impl CtlRequest {
    /// The action to deliver, or `None` for `open`.
    pub fn action(&self) -> Option<Action> {
        match self {
            CtlRequest::Play => Some(Action::Play),
            CtlRequest::TogglePlayback => Some(Action::TogglePlayback),
            CtlRequest::Next => Some(Action::Next),
            CtlRequest::Action { tag } => Some((*tag).into()),
            CtlRequest::Open { .. } => None,
        }
    }
}
