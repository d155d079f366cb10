//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O only; the reducer never touches the filesystem or the
//! terminal directly.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Append an announcement to the announce file, if one is configured.
    AppendAnnouncement { text: String },
}
