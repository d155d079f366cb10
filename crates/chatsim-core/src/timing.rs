//! Timing policy for message reveals.

use std::time::Duration;

/// Typing delay added per character of message text.
pub const PER_CHAR_DELAY: Duration = Duration::from_millis(40);

/// Upper bound for the typing animation of a single message.
pub const MAX_TYPING_DELAY: Duration = Duration::from_millis(2500);

/// Pause between one message finishing its reveal and the next one starting
/// while autoplaying.
pub const DELAY_BETWEEN_MESSAGES: Duration = Duration::from_millis(500);

/// Number of dots drawn by the typing indicator.
pub const TYPING_DOTS: usize = 3;

/// Maps a text length (in characters) to the typing-indicator delay.
///
/// `min(len * 40ms, 2500ms)`, saturating for arbitrarily large lengths.
pub fn compute_typing_delay(text_length: usize) -> Duration {
    let per_char = PER_CHAR_DELAY.as_millis() as u64;
    let max = MAX_TYPING_DELAY.as_millis() as u64;
    let millis = (text_length as u64).saturating_mul(per_char).min(max);
    Duration::from_millis(millis)
}

/// Typing delay for a piece of text, counted in characters rather than bytes.
pub fn typing_delay_for(text: &str) -> Duration {
    compute_typing_delay(text.chars().count())
}
