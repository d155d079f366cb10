//! Deterministic timer queue.
//!
//! Timers are keyed by a virtual deadline (`Duration` since the owner was
//! created) and fire in deadline order; timers sharing a deadline fire in the
//! order they were scheduled. The owner drives time forward explicitly, which
//! keeps playback reproducible in tests and lets hosts choose between real
//! waiting and jumping straight to the next deadline.
//!
//! Cancellation is idempotent: cancelling a handle that already fired, was
//! already cancelled, or was never scheduled by this queue does nothing.

use std::time::Duration;

/// Opaque handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct PendingTimer<E> {
    handle: TimerHandle,
    deadline: Duration,
    event: E,
}

/// A timer that came due.
#[derive(Debug, PartialEq, Eq)]
pub struct FiredTimer<E> {
    pub handle: TimerHandle,
    pub deadline: Duration,
    pub event: E,
}

/// Queue of pending timers carrying events of type `E`.
#[derive(Debug)]
pub struct TimerQueue<E> {
    now: Duration,
    next_handle: u64,
    pending: Vec<PendingTimer<E>>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_handle: 0,
            pending: Vec::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedules `event` to fire `delay` after the current virtual time.
    pub fn schedule(&mut self, delay: Duration, event: E) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.pending.push(PendingTimer {
            handle,
            deadline: self.now.saturating_add(delay),
            event,
        });
        handle
    }

    /// Cancels a timer. Returns true if it was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.handle != handle);
        self.pending.len() != before
    }

    /// Cancels the timer stored in `slot` (if any) and empties the slot.
    pub fn cancel_slot(&mut self, slot: &mut Option<TimerHandle>) {
        if let Some(handle) = slot.take() {
            self.cancel(handle);
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|timer| timer.deadline).min()
    }

    /// Removes and returns the earliest timer due at or before `until`,
    /// moving the clock to its deadline.
    ///
    /// Returns `None` when nothing is due; the clock is left untouched so the
    /// caller can finish the step with [`TimerQueue::set_now`].
    pub fn pop_due(&mut self, until: Duration) -> Option<FiredTimer<E>> {
        let position = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.deadline <= until)
            .min_by_key(|(_, timer)| (timer.deadline, timer.handle.0))
            .map(|(position, _)| position)?;

        let timer = self.pending.remove(position);
        self.now = self.now.max(timer.deadline);
        Some(FiredTimer {
            handle: timer.handle,
            deadline: timer.deadline,
            event: timer.event,
        })
    }

    /// Moves the clock forward. Time never goes backwards.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(ms(30), "c");
        timers.schedule(ms(10), "a");
        timers.schedule(ms(20), "b");

        let order: Vec<_> = std::iter::from_fn(|| timers.pop_due(ms(100)))
            .map(|fired| fired.event)
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert_eq!(timers.now(), ms(30));
    }

    #[test]
    fn test_equal_deadlines_fire_in_schedule_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(Duration::ZERO, 1);
        timers.schedule(Duration::ZERO, 2);
        timers.schedule(Duration::ZERO, 3);

        let order: Vec<_> = std::iter::from_fn(|| timers.pop_due(Duration::ZERO))
            .map(|fired| fired.event)
            .collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_not_due_yet() {
        let mut timers = TimerQueue::new();
        timers.schedule(ms(50), ());
        assert!(timers.pop_due(ms(49)).is_none());
        assert_eq!(timers.now(), Duration::ZERO);
        assert!(timers.pop_due(ms(50)).is_some());
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut timers = TimerQueue::new();
        let handle = timers.schedule(ms(10), "gone");
        assert!(timers.cancel(handle));
        assert!(timers.pop_due(ms(1000)).is_none());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut timers = TimerQueue::new();
        let handle = timers.schedule(ms(10), ());
        assert!(timers.cancel(handle));
        assert!(!timers.cancel(handle));

        let fired = timers.schedule(ms(0), ());
        timers.pop_due(ms(0));
        assert!(!timers.cancel(fired));
    }

    #[test]
    fn test_cancel_slot_empties_slot() {
        let mut timers = TimerQueue::new();
        let mut slot = Some(timers.schedule(ms(10), ()));
        timers.cancel_slot(&mut slot);
        assert!(slot.is_none());
        assert!(timers.is_empty());

        // Empty slot is a no-op.
        timers.cancel_slot(&mut slot);
    }

    #[test]
    fn test_delays_are_relative_to_now() {
        let mut timers = TimerQueue::new();
        timers.set_now(ms(100));
        timers.schedule(ms(20), ());
        assert_eq!(timers.next_deadline(), Some(ms(120)));
    }

    #[test]
    fn test_clock_never_goes_backwards() {
        let mut timers: TimerQueue<()> = TimerQueue::new();
        timers.set_now(ms(100));
        timers.set_now(ms(50));
        assert_eq!(timers.now(), ms(100));
    }
}
