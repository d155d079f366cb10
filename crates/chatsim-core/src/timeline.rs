//! Playback timeline of an uninterrupted autoplay pass.

use std::time::Duration;

use crate::message::Message;
use crate::timing::{self, DELAY_BETWEEN_MESSAGES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEntry {
    pub index: usize,
    /// When the typing indicator appears.
    pub starts_at: Duration,
    pub typing: Duration,
    /// When the text replaces the indicator.
    pub revealed_at: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    pub entries: Vec<TimelineEntry>,
    /// Time until the last message is revealed.
    pub total: Duration,
}

/// Computes when each message starts typing and when it is revealed,
/// assuming autoplay begins at zero and is never interrupted.
pub fn estimate_timeline(messages: &[Message]) -> Timeline {
    let mut entries = Vec::with_capacity(messages.len());
    let mut starts_at = Duration::ZERO;
    let mut total = Duration::ZERO;

    for (index, message) in messages.iter().enumerate() {
        let typing = timing::typing_delay_for(&message.text);
        let revealed_at = starts_at + typing;
        entries.push(TimelineEntry {
            index,
            starts_at,
            typing,
            revealed_at,
        });
        total = revealed_at;
        starts_at = revealed_at + DELAY_BETWEEN_MESSAGES;
    }

    Timeline { entries, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Origin;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_empty_timeline() {
        let timeline = estimate_timeline(&[]);
        assert!(timeline.entries.is_empty());
        assert_eq!(timeline.total, Duration::ZERO);
    }

    #[test]
    fn test_three_message_timeline() {
        let messages = vec![
            Message::plain("Hello", Origin::Right),
            Message::plain("x".repeat(100), Origin::Left),
            Message::plain("", Origin::Right),
        ];
        let timeline = estimate_timeline(&messages);

        let instants: Vec<(Duration, Duration)> = timeline
            .entries
            .iter()
            .map(|entry| (entry.starts_at, entry.revealed_at))
            .collect();
        assert_eq!(
            instants,
            vec![
                (ms(0), ms(200)),
                (ms(700), ms(3200)),
                (ms(3700), ms(3700)),
            ]
        );
        assert_eq!(timeline.total, ms(3700));
    }
}
