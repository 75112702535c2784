//! Crate-wide error type.

use thiserror::Error;

use crate::locator::LocatorError;
use crate::player::PlayerError;

#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(String),

    /// A string could not be turned into a playable locator.
    #[error("invalid locator: {0}")]
    Locator(#[from] LocatorError),

    /// No usable audio output device.
    #[error("audio output error: {0}")]
    Audio(String),

    /// Session bus connection or call failures.
    #[error("D-Bus error: {0}")]
    Bus(#[from] zbus::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<::config::ConfigError> for Error {
    fn from(e: ::config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<PlayerError> for Error {
    fn from(e: PlayerError) -> Self {
        Self::Audio(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
