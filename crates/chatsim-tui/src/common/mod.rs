//! Shared TUI building blocks.

pub mod scrollbar;
pub mod text;

pub use scrollbar::Scrollbar;
