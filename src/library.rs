//! Track catalog: a one-shot scan of the music directory.
//!
//! `scan` walks the directory, reads tags and returns tracks sorted by title.
//! `read_title` re-reads a single file's title tag and is what the player
//! uses for the "now playing" text.

mod model;
mod scan;

pub use model::Track;
pub use scan::{read_title, scan};

#[cfg(test)]
mod tests;
