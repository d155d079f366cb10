//! Navigation bar feature slice (step button and autoplay toggle).
//!
//! - `state.rs`: buttons, roving focus, programmatic enable/toggle
//! - `update.rs`: key routing
//! - `render.rs`: the one-row bar

mod render;
mod state;
mod update;

pub use render::{button_label, render_navigation_bar};
pub use state::{Button, ButtonId, ButtonKind, ButtonPress, NavigationState};
pub use update::handle_key;
