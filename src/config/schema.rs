use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/tonearm/config.toml` or
/// `~/.config/tonearm/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TONEARM__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub ui: UiSettings,
    pub mpris: MprisSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Directory scanned when none is given on the command line.
    pub music_dir: Option<PathBuf>,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            music_dir: None,
            extensions: ["mp3", "flac", "wav", "ogg", "m4a", "opus"]
                .into_iter()
                .map(String::from)
                .collect(),
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// What to do when a track cannot be opened or decoded.
    pub on_error: ErrorPolicy,
    /// How often the playback thread checks for end-of-track (milliseconds).
    pub poll_ms: u64,
    /// Title shown when a track carries no title tag.
    pub unknown_title: String,
    /// Prefix put in front of the title while paused.
    pub paused_prefix: String,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            on_error: ErrorPolicy::Skip,
            poll_ms: 200,
            unknown_title: "Unknown track".to_string(),
            paused_prefix: "Paused: ".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Move on to the next track.
    #[serde(alias = "next")]
    Skip,
    /// Stay idle until the user picks something else.
    #[serde(alias = "idle")]
    Stop,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// How long transient messages stay on screen.
    pub toast_seconds: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ tonearm ~ ".to_string(),
            toast_seconds: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MprisSettings {
    /// Register on the session bus so desktop media widgets can control playback.
    pub enabled: bool,
    /// Suffix of the well-known name `org.mpris.MediaPlayer2.<suffix>`.
    pub bus_suffix: String,
}

impl Default for MprisSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            bus_suffix: "tonearm".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `TONEARM_LOG` is unset.
    pub level: String,
    /// Log file; defaults to `$XDG_STATE_HOME/tonearm/tonearm.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
