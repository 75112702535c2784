use std::{env, path::PathBuf};

use super::schema::Settings;

/// Loading and validation of [`Settings`].
///
/// Sources are layered lowest first: struct defaults, then the config file
/// from [`resolve_config_path`] (optional, may be absent), then `TONEARM__`
/// environment variables with `__` between section and key, e.g.
/// `TONEARM__PLAYBACK__ON_ERROR=stop`.
impl Settings {
    /// Build settings from the config file and environment overrides.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("TONEARM")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Reject values the player cannot run with: a zero `playback.poll_ms`,
    /// an extension list with no usable entry, or an empty
    /// `mpris.bus_suffix` while MPRIS is enabled.
    pub fn validate(&self) -> Result<(), String> {
        if self.playback.poll_ms == 0 {
            return Err("playback.poll_ms must be >= 1".to_string());
        }
        if self
            .library
            .extensions
            .iter()
            .all(|e| e.trim().trim_start_matches('.').is_empty())
        {
            return Err("library.extensions must name at least one extension".to_string());
        }
        if self.mpris.enabled && self.mpris.bus_suffix.trim().is_empty() {
            return Err("mpris.bus_suffix must not be empty".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `TONEARM_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("TONEARM_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/tonearm/config.toml`
/// or `~/.config/tonearm/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("tonearm").join("config.toml"))
}
