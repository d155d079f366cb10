//! Reveal unit: one message's show/typing/reveal lifecycle.
//!
//! ```text
//!            reveal_with_animation            typing timer / complete_reveal
//!  Hidden ───────────────────────────► TypingAnimation ──────────────────────► Revealed
//!    ▲                                                                           │
//!    └──────────────────────── reset / hide (from any state) ◄──────────────────┘
//! ```
//!
//! A unit never talks to other units. It schedules its own typing timer on the
//! sequencer's timer queue and reports completion through [`RevealOutcome`];
//! the sequencer decides what happens next.

use std::time::Duration;

use crate::core::timer::{TimerHandle, TimerQueue};
use crate::dictionary::Dictionary;
use crate::host::HostContext;
use crate::message::Message;
use crate::timing;

/// Timer events owned by the sequencer's queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackTimer {
    /// Reveal the unit at this index (inter-message advance).
    ShowUnit(usize),
    /// The typing delay of the unit at this index elapsed.
    TypingDone(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualState {
    #[default]
    Hidden,
    TypingAnimation,
    Revealed,
}

/// Whether an operation finished a reveal (the completion callback).
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Nothing completed.
    Pending,
    /// The unit just reached `Revealed`; the sequencer must be told.
    Completed,
}

/// Shared services a unit needs while changing state.
pub struct RevealCx<'a> {
    pub timers: &'a mut TimerQueue<PlaybackTimer>,
    pub host: &'a HostContext,
    pub dictionary: &'a Dictionary,
}

#[derive(Debug)]
pub struct RevealUnit {
    index: usize,
    message: Message,
    state: VisualState,
    /// Text shown once revealed; `None` means the message text.
    shown_text: Option<String>,
    typing_timer: Option<TimerHandle>,
    typing_started_at: Option<Duration>,
}

impl RevealUnit {
    pub fn new(index: usize, message: Message) -> Self {
        Self {
            index,
            message,
            state: VisualState::Hidden,
            shown_text: None,
            typing_timer: None,
            typing_started_at: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn state(&self) -> VisualState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state != VisualState::Hidden
    }

    pub fn is_typing(&self) -> bool {
        self.state == VisualState::TypingAnimation
    }

    pub fn is_revealed(&self) -> bool {
        self.state == VisualState::Revealed
    }

    /// Text displayed in the bubble once revealed.
    pub fn shown_text(&self) -> &str {
        self.shown_text.as_deref().unwrap_or(&self.message.text)
    }

    /// Virtual time at which the current typing animation started.
    pub fn typing_started_at(&self) -> Option<Duration> {
        self.typing_started_at
    }

    pub fn has_pending_timer(&self) -> bool {
        self.typing_timer.is_some()
    }

    pub fn typing_delay(&self) -> Duration {
        timing::typing_delay_for(&self.message.text)
    }

    /// Shows the typing indicator and schedules the reveal.
    ///
    /// Re-entering restarts the typing timer.
    pub fn reveal_with_animation(&mut self, cx: &mut RevealCx<'_>) {
        self.state = VisualState::TypingAnimation;
        self.shown_text = None;
        self.typing_started_at = Some(cx.timers.now());
        cx.host.resize();

        cx.timers.cancel_slot(&mut self.typing_timer);
        let delay = self.typing_delay();
        self.typing_timer = Some(
            cx.timers
                .schedule(delay, PlaybackTimer::TypingDone(self.index)),
        );
        tracing::trace!(index = self.index, ?delay, "typing started");
    }

    /// Jumps straight to `Revealed`, optionally with replacement text.
    ///
    /// Completes only when the unit was not already revealed; an already
    /// revealed unit just swaps its text.
    pub fn reveal_immediate(
        &mut self,
        cx: &mut RevealCx<'_>,
        text: Option<String>,
    ) -> RevealOutcome {
        cx.timers.cancel_slot(&mut self.typing_timer);
        self.shown_text = text;
        if self.state == VisualState::Revealed {
            cx.host.resize();
            return RevealOutcome::Pending;
        }
        self.finish(cx)
    }

    /// Forces a unit that is mid-typing to reveal now.
    pub fn complete_reveal(&mut self, cx: &mut RevealCx<'_>) -> RevealOutcome {
        if self.state != VisualState::TypingAnimation {
            return RevealOutcome::Pending;
        }
        cx.timers.cancel_slot(&mut self.typing_timer);
        self.finish(cx)
    }

    /// Called by the sequencer when this unit's typing timer fires.
    pub fn on_typing_elapsed(
        &mut self,
        cx: &mut RevealCx<'_>,
        handle: TimerHandle,
    ) -> RevealOutcome {
        if self.typing_timer != Some(handle) {
            tracing::debug!(index = self.index, "ignoring stale typing timer");
            return RevealOutcome::Pending;
        }
        self.typing_timer = None;
        if self.state != VisualState::TypingAnimation {
            return RevealOutcome::Pending;
        }
        self.finish(cx)
    }

    pub fn hide(&mut self) {
        self.state = VisualState::Hidden;
    }

    pub fn reset(&mut self, timers: &mut TimerQueue<PlaybackTimer>) {
        timers.cancel_slot(&mut self.typing_timer);
        self.shown_text = None;
        self.typing_started_at = None;
        self.hide();
    }

    fn finish(&mut self, cx: &mut RevealCx<'_>) -> RevealOutcome {
        self.state = VisualState::Revealed;
        self.typing_started_at = None;
        cx.host.resize();
        cx.host.read(&cx.dictionary.announcement_for(&self.message));
        tracing::debug!(index = self.index, "message revealed");
        RevealOutcome::Completed
    }
}
