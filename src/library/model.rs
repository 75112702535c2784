use std::time::Duration;

use crate::locator::Locator;

/// One playable catalog entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    /// 1-based position in the sorted catalog.
    pub id: u64,
    pub title: String,
    pub locator: Locator,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
}

impl Track {
    /// Text shown in the list row.
    pub fn display(&self) -> String {
        match self.artist.as_deref().map(str::trim) {
            Some(a) if !a.is_empty() => format!("{} - {}", self.title, a),
            _ => self.title.clone(),
        }
    }
}
