//! File logging.
//!
//! The TUI owns the terminal, so everything goes to a log file instead.

use std::env;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;
use crate::error::Result;

/// Overrides `logging.level`, using `EnvFilter` directive syntax.
pub const LOG_ENV: &str = "TONEARM_LOG";

/// `$XDG_STATE_HOME/tonearm/tonearm.log`, then `~/.local/state/...`, then the temp dir.
pub fn default_log_path() -> PathBuf {
    let base = env::var_os("XDG_STATE_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or_else(|| env::var_os("HOME").map(|h| PathBuf::from(h).join(".local").join("state")))
        .unwrap_or_else(env::temp_dir);
    base.join("tonearm").join("tonearm.log")
}

fn filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber and return the file it writes to.
pub fn init(settings: &LoggingSettings) -> Result<PathBuf> {
    let path = settings.file.clone().unwrap_or_else(default_log_path);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter(settings))
        .try_init();

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_the_log_file_and_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tonearm.log");
        let settings = LoggingSettings {
            level: "debug".into(),
            file: Some(path.clone()),
        };

        let got = init(&settings).unwrap();
        assert_eq!(got, path);
        assert!(path.exists());
    }

    #[test]
    fn log_path_ends_in_app_dir() {
        let p = default_log_path();
        assert!(p.ends_with("tonearm/tonearm.log"));
    }
}
