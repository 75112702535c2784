use crate::config;
use crate::error::Error;

/// Load settings, falling back to defaults. The reason for a fallback is
/// returned so it can be logged once logging is up.
pub fn load_settings() -> (config::Settings, Option<Error>) {
    match config::Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (config::Settings::default(), Some(Error::Config(msg))),
        },
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => (config::Settings::default(), Some(Error::from(e))),
    }
}
