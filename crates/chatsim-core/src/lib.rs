//! Core chat simulator library (sequencing state machine, content, config).

pub mod color;
pub mod config;
pub mod content;
pub mod core;
pub mod dictionary;
pub mod host;
pub mod message;
pub mod timeline;
pub mod timing;
