//! The seam between the controller and whatever actually decodes audio.

use std::sync::mpsc::Sender;

use thiserror::Error;

use crate::locator::Locator;

use super::types::{DecoderEvent, PlayerMsg, Ticket};

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("no audio output: {0}")]
    Output(String),
    #[error("cannot open {locator}: {reason}")]
    Open { locator: Locator, reason: String },
}

/// Opens decoder sessions. Preparation is asynchronous: `open` returns right
/// away and the outcome arrives later as a `DecoderEvent` through `events`.
pub trait Backend {
    type Session: Session;

    fn open(
        &mut self,
        locator: &Locator,
        ticket: Ticket,
        events: &EventSink,
    ) -> Result<Self::Session, PlayerError>;
}

/// One decoder bound to one track. Dropping it releases the decoder.
pub trait Session {
    /// Begin or resume audio output.
    fn start(&mut self);
    fn pause(&mut self);
    /// True once the started track has played to its end.
    fn finished(&self) -> bool;
}

/// Posts decoder callbacks onto the playback thread's queue.
#[derive(Clone)]
pub struct EventSink {
    tx: Sender<PlayerMsg>,
}

impl EventSink {
    pub fn new(tx: Sender<PlayerMsg>) -> Self {
        Self { tx }
    }

    pub fn prepared(&self, ticket: Ticket, title: Option<String>) {
        let _ = self
            .tx
            .send(PlayerMsg::Event(DecoderEvent::Prepared { ticket, title }));
    }

    pub fn failed(&self, ticket: Ticket, reason: impl Into<String>) {
        let _ = self.tx.send(PlayerMsg::Event(DecoderEvent::Failed {
            ticket,
            reason: reason.into(),
        }));
    }
}
