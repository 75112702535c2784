//! MPRIS over the session bus.
//!
//! This is the desktop's persistent media notification: widgets read the
//! title and status from `org.mpris.MediaPlayer2.Player` and their buttons
//! call back into it. A small `dev.tonearm.Relay` interface on the same
//! object lets `tonearm ctl` deliver action tags to a running instance.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::{debug, info, warn};
use zbus::{Connection, fdo, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::locator::Locator;
use crate::notification::{APP_NAME, NotificationView, Presenter};
use crate::player::PlayerState;
use crate::relay::{Action, Relay};

pub const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
pub const RELAY_IFACE: &str = "dev.tonearm.Relay";

pub fn bus_name(suffix: &str) -> String {
    format!("org.mpris.MediaPlayer2.{suffix}")
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlayerState,
    title: Option<String>,
    url: Option<String>,
    track_id: Option<OwnedObjectPath>,
}

/// Writes notification views into the state served on the bus.
pub struct MprisPresenter {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

impl Presenter for MprisPresenter {
    fn present(&mut self, view: &NotificationView) {
        debug!(
            summary = view.summary,
            body = %view.body,
            playing = view.playing,
            ongoing = view.ongoing,
            buttons = ?view.actions.iter().map(|a| (a.label, a.action.tag())).collect::<Vec<_>>(),
            "notification"
        );
        if let Ok(mut s) = self.state.lock() {
            s.playback = view.state;
            s.title = Some(view.body.clone());
            s.url = view.track.as_ref().map(|(_, l)| l.to_uri());
            s.track_id = view.track.as_ref().and_then(|(i, _)| {
                ObjectPath::try_from(format!("{OBJECT_PATH}/track/{i}"))
                    .ok()
                    .map(OwnedObjectPath::from)
            });
        }
        let _ = self.notify.send(());
    }

    fn withdraw(&mut self) {
        if let Ok(mut s) = self.state.lock() {
            *s = SharedState::default();
        }
        let _ = self.notify.send(());
    }
}

struct RootIface;

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {}

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        APP_NAME
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        ["audio/mpeg", "audio/flac", "audio/ogg", "audio/wav"]
            .into_iter()
            .map(String::from)
            .collect()
    }
}

struct PlayerIface {
    relay: Relay,
    state: Arc<Mutex<SharedState>>,
}

impl PlayerIface {
    fn playback(&self) -> PlayerState {
        self.state
            .lock()
            .map(|s| s.playback)
            .unwrap_or(PlayerState::Idle)
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        self.relay.deliver(Action::Next);
    }

    fn previous(&self) {
        debug!("MPRIS Previous is not supported");
    }

    fn play(&self) {
        match self.playback() {
            PlayerState::Paused => self.relay.deliver(Action::TogglePlayback),
            PlayerState::Idle => self.relay.deliver(Action::Play),
            PlayerState::Playing | PlayerState::Preparing => {}
        }
    }

    fn pause(&self) {
        if self.playback() == PlayerState::Playing {
            self.relay.deliver(Action::TogglePlayback);
        }
    }

    fn play_pause(&self) {
        self.relay.deliver(Action::TogglePlayback);
    }

    fn stop(&self) {
        debug!("MPRIS Stop is not supported");
    }

    fn open_uri(&self, uri: &str) {
        self.relay.open(uri);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        match self.playback() {
            PlayerState::Idle => "Stopped",
            PlayerState::Playing => "Playing",
            // A loading track is shown as paused until audio starts.
            PlayerState::Paused | PlayerState::Preparing => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        if let Some(id) = &s.track_id {
            if let Ok(v) = OwnedValue::try_from(Value::from(id.clone())) {
                map.insert("mpris:trackid".to_string(), v);
            }
        }
        if let Some(title) = &s.title {
            if let Ok(v) = OwnedValue::try_from(Value::from(title.clone())) {
                map.insert("xesam:title".to_string(), v);
            }
        }
        if let Some(url) = &s.url {
            if let Ok(v) = OwnedValue::try_from(Value::from(url.clone())) {
                map.insert("xesam:url".to_string(), v);
            }
        }
        map
    }
}

/// Action tags from `tonearm ctl`.
struct RelayIface {
    relay: Relay,
}

#[interface(name = "dev.tonearm.Relay")]
impl RelayIface {
    fn deliver(&self, tag: &str) -> fdo::Result<()> {
        let action: Action = tag
            .parse()
            .map_err(|e: crate::relay::UnknownAction| fdo::Error::InvalidArgs(e.to_string()))?;
        self.relay.deliver(action);
        Ok(())
    }

    fn open(&self, locator: &str) {
        self.relay.open(locator);
    }
}

/// Register the MPRIS service on a background thread.
///
/// Bus failures are logged and leave the player working without it.
pub fn spawn_mpris(relay: Relay, bus_suffix: &str) -> MprisPresenter {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();
    let name = bus_name(bus_suffix);

    let state_for_thread = state.clone();
    let spawned = std::thread::Builder::new()
        .name("tonearm-mpris".into())
        .spawn(move || {
            block_on(async move {
                if let Err(e) = serve(name, relay, state_for_thread, notify_rx).await {
                    warn!("MPRIS disabled: {e}");
                }
            });
        });
    if let Err(e) = spawned {
        warn!("MPRIS disabled: cannot spawn thread: {e}");
    }

    MprisPresenter {
        state,
        notify: notify_tx,
    }
}

async fn serve(
    name: String,
    relay: Relay,
    state: Arc<Mutex<SharedState>>,
    notify_rx: Receiver<()>,
) -> zbus::Result<()> {
    let connection = Connection::session().await?;
    connection.request_name(name.as_str()).await?;

    let object_server = connection.object_server();
    object_server.at(OBJECT_PATH, RootIface).await?;
    object_server
        .at(
            OBJECT_PATH,
            PlayerIface {
                relay: relay.clone(),
                state,
            },
        )
        .await?;
    object_server.at(OBJECT_PATH, RelayIface { relay }).await?;
    info!(%name, "MPRIS service registered");

    let player = object_server
        .interface::<_, PlayerIface>(OBJECT_PATH)
        .await?;

    loop {
        let mut changed = false;
        loop {
            match notify_rx.try_recv() {
                Ok(()) => changed = true,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }

        if changed {
            let iface = player.get().await;
            let emitter = player.signal_emitter();
            if let Err(e) = iface.playback_status_changed(emitter).await {
                debug!("PropertiesChanged(PlaybackStatus) failed: {e}");
            }
            if let Err(e) = iface.metadata_changed(emitter).await {
                debug!("PropertiesChanged(Metadata) failed: {e}");
            }
        }

        Timer::after(Duration::from_millis(100)).await;
    }
}

/// Deliver an action tag to a running instance.
pub fn send_action(bus_suffix: &str, action: Action) -> crate::error::Result<()> {
    call_relay(bus_suffix, "Deliver", action.tag())
}

/// Ask a running instance to replace its playlist with `locator` and play it.
pub fn send_open(bus_suffix: &str, raw: &str) -> crate::error::Result<()> {
    let locator = Locator::parse(raw)?;
    call_relay(bus_suffix, "Open", &locator.to_uri())
}

fn call_relay(bus_suffix: &str, method: &str, arg: &str) -> crate::error::Result<()> {
    let name = bus_name(bus_suffix);
    block_on(async {
        let connection = Connection::session().await?;
        connection
            .call_method(
                Some(name.as_str()),
                OBJECT_PATH,
                Some(RELAY_IFACE),
                method,
                &(arg,),
            )
            .await?;
        Ok::<(), crate::error::Error>(())
    })
}
