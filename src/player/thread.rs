use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error};

use crate::notification::Presenter;

use super::backend::{Backend, EventSink, PlayerError};
use super::controller::{Controller, ControllerOptions, Flow};
use super::types::{PlaybackHandle, PlayerMsg, PlayerSender};

/// Spawn the playback thread: the single serialized context on which every
/// command and decoder callback is handled.
///
/// The backend is built on the new thread (audio streams are not `Send`);
/// a construction failure is reported back before this returns.
pub(super) fn spawn_player_thread<B, F>(
    make_backend: F,
    tx: PlayerSender,
    rx: Receiver<PlayerMsg>,
    presenter: Box<dyn Presenter + Send>,
    info: PlaybackHandle,
    options: ControllerOptions,
    poll: Duration,
) -> Result<JoinHandle<()>, PlayerError>
where
    B: Backend + 'static,
    F: FnOnce() -> Result<B, PlayerError> + Send + 'static,
{
    let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), PlayerError>>(1);

    let handle = thread::Builder::new()
        .name("tonearm-player".into())
        .spawn(move || {
            let backend = match make_backend() {
                Ok(b) => {
                    let _ = ready_tx.send(Ok(()));
                    b
                }
                Err(e) => {
                    error!("failed to initialize audio backend: {e}");
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };

            let events = EventSink::new(tx.raw());
            let mut controller = Controller::new(backend, events, presenter, info, options);

            loop {
                match rx.recv_timeout(poll) {
                    Ok(msg) => {
                        if controller.handle(msg) == Flow::Quit {
                            break;
                        }
                        controller.poll();
                    }
                    // Periodic end-of-track check.
                    Err(RecvTimeoutError::Timeout) => controller.poll(),
                    Err(RecvTimeoutError::Disconnected) => {
                        controller.shutdown();
                        break;
                    }
                }
            }
            debug!(playlist = controller.playlist().len(), "player thread finished");
        })
        .map_err(|e| PlayerError::Output(format!("cannot spawn player thread: {e}")))?;

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(handle),
        Ok(Err(e)) => {
            let _ = handle.join();
            Err(e)
        }
        Err(_) => Err(PlayerError::Output(
            "player thread exited during startup".to_string(),
        )),
    }
}
