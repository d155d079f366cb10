//! Status line feature slice.
//!
//! Shows the latest announcement (the terminal's stand-in for a live
//! region), key hints before anything was announced, and playback progress.

mod render;
mod state;

pub use render::{KEY_HINTS, progress_label, render_status_line};
pub use state::StatusLine;
