//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the current track list,
//! the cursor and the toast shown over it.

mod model;

pub use model::*;
