//! Playback subsystem: the state machine and the thread that runs it.
//!
//! `Player` spawns a dedicated thread owning a `Controller`. Commands and
//! decoder callbacks share one queue, so they are handled strictly in order
//! without locks around playback state.

mod backend;
mod controller;
mod handle;
mod sink;
mod thread;
mod types;

pub use backend::{Backend, EventSink, PlayerError, Session};
pub use controller::{Controller, ControllerOptions, Flow, NOT_IN_PLAYLIST};
pub use handle::Player;
pub use types::*;
