//! Feature slices for the TUI (state/update/render per slice).

pub mod chat;
pub mod navigation;
pub mod statusline;
