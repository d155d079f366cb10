//! Chat transcript feature slice.
//!
//! - `state.rs`: scroll mode and cached layout
//! - `update.rs`: wheel and page scrolling
//! - `render.rs`: bubbles, typing indicator, scrollbar

mod render;
mod state;
mod update;

pub use render::{
    CHAT_MARGIN, TYPING_FRAME, chat_lines, content_width, max_bubble_width, render_chat,
    typing_frame,
};
pub use state::{ChatState, ScrollMode, ScrollState};
pub use update::{MOUSE_SCROLL_LINES, handle_mouse, handle_scroll_key};
