//! UI event types.
//!
//! Every input the reducer sees is a `UiEvent`: terminal input, the frame
//! and tick cadence from the runtime, and notifications the playback
//! sequencer sends through the inbox while it runs.

use std::time::Duration;

use crossterm::event::Event as CrosstermEvent;

#[derive(Debug)]
pub enum UiEvent {
    /// Clock tick carrying the wall time elapsed since the previous tick.
    Tick { elapsed: Duration },
    /// Emitted before other events each loop with the terminal size.
    Frame { width: u16, height: u16 },
    /// Raw terminal input.
    Terminal(CrosstermEvent),

    // ========================================================================
    // Playback notifications (sent through the inbox)
    // ========================================================================
    /// The host was asked to re-layout the chat.
    HostResized,
    /// Text for assistive technology.
    Announced(String),
    /// A message finished its reveal.
    MessageRevealed(usize),
    /// The chat should show its newest content.
    ScrollToBottom,
    /// The last message was revealed.
    PlaybackEnded,
}
