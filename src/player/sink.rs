//! `rodio` implementation of the decoder seam.
//!
//! Each session owns a paused `Sink`. A loader thread opens and decodes the
//! file, appends it to the sink and posts `Prepared` (or `Failed`). The
//! controller starts output when that event reaches the playback thread.

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use tracing::debug;

use crate::library::read_title;
use crate::locator::Locator;

use super::backend::{Backend, EventSink, PlayerError, Session};
use super::types::Ticket;

pub struct RodioBackend {
    stream: OutputStream,
}

impl RodioBackend {
    /// Open the default output device. Must run on the thread that will own it.
    pub fn open_default() -> Result<Self, PlayerError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlayerError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which would
        // scribble over the TUI.
        stream.log_on_drop(false);
        Ok(Self { stream })
    }
}

impl Backend for RodioBackend {
    type Session = RodioSession;

    fn open(
        &mut self,
        locator: &Locator,
        ticket: Ticket,
        events: &EventSink,
    ) -> Result<RodioSession, PlayerError> {
        let sink = Arc::new(Sink::connect_new(self.stream.mixer()));
        sink.pause();
        let cancelled = Arc::new(AtomicBool::new(false));

        let path = locator.path().to_path_buf();
        let loader_sink = sink.clone();
        let loader_cancelled = cancelled.clone();
        let events = events.clone();
        thread::Builder::new()
            .name("tonearm-loader".into())
            .spawn(move || {
                let decoded = File::open(&path)
                    .map_err(|e| e.to_string())
                    .and_then(|f| Decoder::new(BufReader::new(f)).map_err(|e| e.to_string()));

                // The session was released while we were decoding.
                if loader_cancelled.load(Ordering::Acquire) {
                    debug!(path = %path.display(), "preparation abandoned");
                    return;
                }

                match decoded {
                    Ok(source) => {
                        loader_sink.append(source);
                        events.prepared(ticket, read_title(&path));
                    }
                    Err(reason) => events.failed(ticket, reason),
                }
            })
            .map_err(|e| PlayerError::Open {
                locator: locator.clone(),
                reason: e.to_string(),
            })?;

        Ok(RodioSession {
            sink,
            cancelled,
            started: false,
        })
    }
}

pub struct RodioSession {
    sink: Arc<Sink>,
    cancelled: Arc<AtomicBool>,
    started: bool,
}

impl Session for RodioSession {
    fn start(&mut self) {
        self.started = true;
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn finished(&self) -> bool {
        self.started && self.sink.empty()
    }
}

impl Drop for RodioSession {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        self.sink.stop();
    }
}
