use std::sync::mpsc::SendError;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::PlaybackSettings;
use crate::notification::Presenter;

use super::backend::{Backend, PlayerError};
use super::controller::ControllerOptions;
use super::sink::RodioBackend;
use super::thread::spawn_player_thread;
use super::types::{PlaybackHandle, PlaybackInfo, PlayerCmd, PlayerMsg, PlayerSender, channel};

/// Owner-side handle to the playback thread.
pub struct Player {
    tx: PlayerSender,
    info: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl Player {
    /// Start playback on the default audio device.
    pub fn rodio<P>(settings: &PlaybackSettings, presenter: P) -> Result<Self, PlayerError>
    where
        P: FnOnce(PlayerSender) -> Box<dyn Presenter + Send>,
    {
        Self::spawn(
            RodioBackend::open_default,
            presenter,
            ControllerOptions::from(settings),
            Duration::from_millis(settings.poll_ms.max(1)),
        )
    }

    /// `presenter` receives a sender so surfaces like MPRIS can relay their
    /// buttons back into the same queue.
    pub fn spawn<B, F, P>(
        make_backend: F,
        presenter: P,
        options: ControllerOptions,
        poll: Duration,
    ) -> Result<Self, PlayerError>
    where
        B: Backend + 'static,
        F: FnOnce() -> Result<B, PlayerError> + Send + 'static,
        P: FnOnce(PlayerSender) -> Box<dyn Presenter + Send>,
    {
        let (tx, rx) = channel();
        let presenter = presenter(tx.clone());
        let info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let join = spawn_player_thread(
            make_backend,
            tx.clone(),
            rx,
            presenter,
            info.clone(),
            options,
            poll,
        )?;

        Ok(Self {
            tx,
            info,
            join: Mutex::new(Some(join)),
        })
    }

    pub fn info(&self) -> PlaybackHandle {
        self.info.clone()
    }

    pub fn sender(&self) -> PlayerSender {
        self.tx.clone()
    }

    pub fn send(&self, cmd: PlayerCmd) -> Result<(), SendError<PlayerMsg>> {
        self.tx.send(cmd)
    }

    /// Stop playback and wait for the thread to exit.
    pub fn quit(&self) {
        let _ = self.send(PlayerCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
