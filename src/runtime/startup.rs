use std::env;
use std::path::PathBuf;

use tracing::info;

use crate::app::App;
use crate::config::LibrarySettings;
use crate::player::{PlayerCmd, PlayerSender};
use crate::relay::Relay;

/// Directory to scan: the CLI argument, then `library.music_dir`, then the working dir.
pub fn resolve_dir(cli_dir: Option<PathBuf>, library: &LibrarySettings) -> PathBuf {
    cli_dir
        .or_else(|| library.music_dir.clone())
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Hand the scanned catalog to the player, then apply an optional external
/// request so it replaces that playlist.
pub fn seed_player(app: &App, player: &PlayerSender, open: Option<&str>) {
    let _ = player.send(PlayerCmd::ReplacePlaylist(app.locators()));

    if let Some(raw) = open {
        info!(locator = raw, "opening from command line");
        Relay::new(player.clone()).open(raw);
    }
}
