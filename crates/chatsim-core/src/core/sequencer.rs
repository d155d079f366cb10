//! Sequencer: orchestrates reveal units.
//!
//! Owns one [`RevealUnit`] per message, the timer queue all units share, and
//! the one-shot visibility trigger. Hosts drive it by:
//! - reporting container visibility (`set_visible`)
//! - advancing the virtual clock (`advance` / `advance_to`)
//! - forwarding user commands (`step`, `toggle_autoplay`, `reset`)
//!
//! ## Invariants
//!
//! - `active_index` only moves forward until `reset()` clears it.
//! - At most one advance timer (`ShowUnit`) is pending at any time.
//! - The next unit is only scheduled once the active unit completed its
//!   reveal (from `handle_unit_revealed`, or by `step()` right after forcing
//!   completion).
//! - Cancelled timers and subscriptions never fire.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::reveal::{PlaybackTimer, RevealCx, RevealOutcome, RevealUnit};
use crate::core::timer::{TimerHandle, TimerQueue};
use crate::core::trigger::{OnceVisible, Subscription};
use crate::dictionary::Dictionary;
use crate::host::HostContext;
use crate::message::Message;
use crate::timing::DELAY_BETWEEN_MESSAGES;

/// When playback starts on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartBehavior {
    /// Start autoplay the first time the container becomes visible.
    #[default]
    Auto,
    /// Wait for the user to press play or step.
    Manually,
}

/// Receives sequencing notifications (the navigation control side).
pub trait SequenceHandler {
    /// A unit finished its reveal.
    fn on_showing_process_done(&mut self, _index: usize) {}

    /// The last unit was revealed. Fires once per pass.
    fn on_ended(&mut self);

    /// The container should scroll to its newest content.
    fn scroll_to_bottom(&mut self) {}
}

/// Handler that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

impl SequenceHandler for NoopHandler {
    fn on_ended(&mut self) {}
}

#[derive(Debug)]
pub struct Sequencer<H> {
    units: Vec<RevealUnit>,
    active_index: Option<usize>,
    autoplaying: bool,
    advance_timer: Option<TimerHandle>,
    timers: TimerQueue<PlaybackTimer>,
    trigger: OnceVisible,
    subscription: Option<Subscription>,
    start_behavior: StartBehavior,
    ended: bool,
    host: HostContext,
    dictionary: Dictionary,
    handler: H,
}

impl<H: SequenceHandler> Sequencer<H> {
    pub fn new(
        messages: Vec<Message>,
        start_behavior: StartBehavior,
        host: HostContext,
        dictionary: Dictionary,
        handler: H,
    ) -> Self {
        let units = messages
            .into_iter()
            .enumerate()
            .map(|(index, message)| RevealUnit::new(index, message))
            .collect();

        Self {
            units,
            active_index: None,
            autoplaying: false,
            advance_timer: None,
            timers: TimerQueue::new(),
            trigger: OnceVisible::new(false),
            subscription: None,
            start_behavior,
            ended: false,
            host,
            dictionary,
            handler,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn units(&self) -> &[RevealUnit] {
        &self.units
    }

    pub fn unit(&self, index: usize) -> Option<&RevealUnit> {
        self.units.get(index)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn is_autoplaying(&self) -> bool {
        self.autoplaying
    }

    /// True once the last unit was revealed in the current pass.
    pub fn has_ended(&self) -> bool {
        self.ended
    }

    pub fn start_behavior(&self) -> StartBehavior {
        self.start_behavior
    }

    pub fn is_visible(&self) -> bool {
        self.trigger.is_visible()
    }

    /// True while a `start()` is waiting for the container to become visible.
    pub fn is_waiting_for_visibility(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn has_pending_advance(&self) -> bool {
        self.advance_timer.is_some()
    }

    /// Number of timers (advance + typing) still pending.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    // ========================================================================
    // Host lifecycle
    // ========================================================================

    /// Called once the container is attached; starts per the start behavior.
    pub fn attach(&mut self) {
        if self.start_behavior == StartBehavior::Auto {
            self.start();
        }
    }

    /// Reports container visibility. Fires a pending `start()` on first
    /// visibility.
    pub fn set_visible(&mut self, visible: bool) {
        let fired = self.trigger.set_visible(visible);
        self.dispatch_trigger(&fired);
    }

    /// Advances the virtual clock by `elapsed`, firing every due timer.
    pub fn advance(&mut self, elapsed: Duration) {
        let target = self.timers.now().saturating_add(elapsed);
        self.advance_to(target);
    }

    /// Advances the virtual clock to `target`, firing every due timer in
    /// deadline order. Timers scheduled while firing are honored if they come
    /// due before `target`.
    pub fn advance_to(&mut self, target: Duration) {
        while let Some(fired) = self.timers.pop_due(target) {
            match fired.event {
                PlaybackTimer::ShowUnit(index) => {
                    if self.advance_timer != Some(fired.handle) {
                        continue;
                    }
                    self.advance_timer = None;
                    self.reveal_unit(index);
                }
                PlaybackTimer::TypingDone(index) => {
                    let outcome = {
                        let Some(unit) = self.units.get_mut(index) else {
                            continue;
                        };
                        let mut cx = RevealCx {
                            timers: &mut self.timers,
                            host: &self.host,
                            dictionary: &self.dictionary,
                        };
                        unit.on_typing_elapsed(&mut cx, fired.handle)
                    };
                    if outcome == RevealOutcome::Completed {
                        self.handle_unit_revealed(index);
                    }
                }
            }
        }
        self.timers.set_now(target);
    }

    // ========================================================================
    // Playback commands
    // ========================================================================

    /// Starts autoplay once the container is visible.
    ///
    /// Replaces any earlier subscription, so a start fires at most once.
    pub fn start(&mut self) {
        if let Some(previous) = self.subscription.take() {
            self.trigger.unsubscribe(previous);
        }
        self.subscription = Some(self.trigger.subscribe());
        let fired = self.trigger.take_fired();
        self.dispatch_trigger(&fired);
    }

    /// Completes the active unit and reveals the next one right away.
    pub fn step(&mut self) {
        self.complete_current();
        self.show_unit(self.next_index(), Duration::ZERO);
    }

    /// Stops autoplay, cancels the pending advance and completes the active unit.
    pub fn stop(&mut self) {
        self.autoplaying = false;
        self.cancel_subscription();
        self.timers.cancel_slot(&mut self.advance_timer);
        self.complete_current();
    }

    pub fn toggle_autoplay(&mut self) {
        if self.autoplaying {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Schedules the reveal of unit `index` after `delay`.
    ///
    /// Indices outside the unit list, or behind the active unit, are ignored.
    /// Any previously pending advance is cancelled.
    pub fn show_unit(&mut self, index: usize, delay: Duration) {
        if index >= self.units.len() {
            tracing::trace!(index, "show_unit out of range");
            return;
        }
        if self.active_index.is_some_and(|active| index < active) {
            tracing::debug!(index, active = ?self.active_index, "show_unit behind active unit");
            return;
        }

        self.timers.cancel_slot(&mut self.advance_timer);
        self.advance_timer = Some(
            self.timers
                .schedule(delay, PlaybackTimer::ShowUnit(index)),
        );
    }

    /// Completion callback of a unit.
    pub fn handle_unit_revealed(&mut self, index: usize) {
        self.handler.on_showing_process_done(index);
        self.handler.scroll_to_bottom();

        let next = index + 1;
        if next >= self.units.len() && !self.ended {
            self.ended = true;
            tracing::info!(
                content = %self.host.content_id(),
                messages = self.units.len(),
                "conversation ended"
            );
            self.handler.on_ended();
        }

        if !self.autoplaying {
            return;
        }

        self.show_unit(next, DELAY_BETWEEN_MESSAGES);
    }

    /// Reveals every remaining unit at once, skipping typing and gaps.
    ///
    /// Autoplay stops; the end-of-sequence notification fires as usual when
    /// the last unit is reached.
    pub fn fast_forward(&mut self) {
        self.autoplaying = false;
        self.cancel_subscription();
        self.timers.cancel_slot(&mut self.advance_timer);

        for index in self.active_index.unwrap_or(0)..self.units.len() {
            self.active_index = Some(index);
            let outcome = {
                let unit = &mut self.units[index];
                let mut cx = RevealCx {
                    timers: &mut self.timers,
                    host: &self.host,
                    dictionary: &self.dictionary,
                };
                unit.reveal_immediate(&mut cx, None)
            };
            if outcome == RevealOutcome::Completed {
                self.handle_unit_revealed(index);
            }
        }
        self.handler.scroll_to_bottom();
    }

    /// Returns to the initial state: everything hidden, nothing scheduled.
    ///
    /// With `StartBehavior::Auto` playback is armed again and resumes the next
    /// time the container is visible.
    pub fn reset(&mut self) {
        self.timers.cancel_slot(&mut self.advance_timer);
        self.cancel_subscription();
        self.active_index = None;
        self.autoplaying = false;
        self.ended = false;

        for unit in &mut self.units {
            unit.reset(&mut self.timers);
        }
        tracing::debug!("sequencer reset");

        if self.start_behavior == StartBehavior::Auto {
            self.start();
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn next_index(&self) -> usize {
        self.active_index.map_or(0, |active| active + 1)
    }

    fn dispatch_trigger(&mut self, fired: &[Subscription]) {
        let Some(subscription) = self.subscription else {
            return;
        };
        if !fired.contains(&subscription) {
            return;
        }
        self.subscription = None;
        self.on_visible();
    }

    fn on_visible(&mut self) {
        tracing::debug!(next = self.next_index(), "container visible, autoplaying");
        self.autoplaying = true;
        // A unit still typing schedules its successor when it completes.
        let active_typing = self
            .active_index
            .and_then(|index| self.units.get(index))
            .is_some_and(RevealUnit::is_typing);
        if active_typing {
            return;
        }
        self.show_unit(self.next_index(), Duration::ZERO);
    }

    fn cancel_subscription(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.trigger.unsubscribe(subscription);
        }
    }

    fn reveal_unit(&mut self, index: usize) {
        let Some(unit) = self.units.get_mut(index) else {
            return;
        };
        self.active_index = Some(index);
        let mut cx = RevealCx {
            timers: &mut self.timers,
            host: &self.host,
            dictionary: &self.dictionary,
        };
        unit.reveal_with_animation(&mut cx);
        self.handler.scroll_to_bottom();
    }

    fn complete_current(&mut self) {
        let Some(index) = self.active_index else {
            return;
        };
        let outcome = {
            let Some(unit) = self.units.get_mut(index) else {
                return;
            };
            let mut cx = RevealCx {
                timers: &mut self.timers,
                host: &self.host,
                dictionary: &self.dictionary,
            };
            unit.complete_reveal(&mut cx)
        };
        if outcome == RevealOutcome::Completed {
            self.handle_unit_revealed(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::core::reveal::VisualState;
    use crate::host::ContentId;
    use crate::message::Origin;
    use crate::timing::compute_typing_delay;

    #[derive(Debug, Default)]
    struct Recording {
        revealed: Vec<(usize, Duration)>,
        ended: usize,
        scrolls: usize,
    }

    /// Handler sharing its log with the test through an `Arc<Mutex<_>>`, so
    /// the log can be read alongside the sequencer clock.
    #[derive(Clone)]
    struct Recorder {
        log: Arc<Mutex<Recording>>,
        clock: Arc<Mutex<Duration>>,
    }

    impl SequenceHandler for Recorder {
        fn on_showing_process_done(&mut self, index: usize) {
            let now = *self.clock.lock().unwrap();
            self.log.lock().unwrap().revealed.push((index, now));
        }

        fn on_ended(&mut self) {
            self.log.lock().unwrap().ended += 1;
        }

        fn scroll_to_bottom(&mut self) {
            self.log.lock().unwrap().scrolls += 1;
        }
    }

    struct Harness {
        seq: Sequencer<Recorder>,
        log: Arc<Mutex<Recording>>,
        clock: Arc<Mutex<Duration>>,
        reads: Arc<Mutex<Vec<String>>>,
    }

    impl Harness {
        fn new(texts: &[&str], start: StartBehavior) -> Self {
            let log = Arc::new(Mutex::new(Recording::default()));
            let clock = Arc::new(Mutex::new(Duration::ZERO));
            let reads = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&reads);
            let host = HostContext::new(
                ContentId("harness".into()),
                || {},
                move |text| sink.lock().unwrap().push(text.to_string()),
            );
            let messages = texts
                .iter()
                .enumerate()
                .map(|(i, text)| {
                    let origin = if i % 2 == 0 { Origin::Right } else { Origin::Left };
                    Message::plain(*text, origin)
                })
                .collect();
            let handler = Recorder {
                log: Arc::clone(&log),
                clock: Arc::clone(&clock),
            };
            Self {
                seq: Sequencer::new(messages, start, host, Dictionary::new(), handler),
                log,
                clock,
                reads,
            }
        }

        /// Advances in 1ms slices so the handler sees accurate timestamps.
        fn run_for(&mut self, total: Duration) {
            let end = self.seq.now() + total;
            while self.seq.now() < end {
                let step = match self.seq.next_deadline() {
                    Some(deadline) if deadline <= end => deadline,
                    _ => end,
                };
                *self.clock.lock().unwrap() = step;
                self.seq.advance_to(step);
            }
        }

        fn pump(&mut self) {
            *self.clock.lock().unwrap() = self.seq.now();
            self.seq.advance(Duration::ZERO);
        }

        fn states(&self) -> Vec<VisualState> {
            self.seq.units().iter().map(RevealUnit::state).collect()
        }

        fn revealed(&self) -> Vec<(usize, Duration)> {
            self.log.lock().unwrap().revealed.clone()
        }

        fn ended(&self) -> usize {
            self.log.lock().unwrap().ended
        }
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    const THREE: [&str; 3] = ["Hello!", "How are you doing today?", "Fine."];

    #[test]
    fn test_scenario_autoplay_reveals_in_order_with_gaps() {
        let mut h = Harness::new(&THREE, StartBehavior::Auto);
        h.seq.set_visible(true);
        h.seq.attach();

        h.run_for(Duration::from_secs(10));

        let d0 = compute_typing_delay(6);
        let d1 = compute_typing_delay(24);
        let d2 = compute_typing_delay(5);
        let r0 = d0;
        let r1 = r0 + ms(500) + d1;
        let r2 = r1 + ms(500) + d2;
        assert_eq!(h.revealed(), vec![(0, r0), (1, r1), (2, r2)]);
        assert_eq!(h.ended(), 1);
        assert_eq!(h.seq.active_index(), Some(2));
        assert!(h.states().iter().all(|s| *s == VisualState::Revealed));
        assert_eq!(h.seq.pending_timers(), 0);
        assert_eq!(h.reads.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_autoplay_waits_for_visibility() {
        let mut h = Harness::new(&THREE, StartBehavior::Auto);
        h.seq.attach();
        h.run_for(Duration::from_secs(5));

        assert!(h.revealed().is_empty());
        assert!(h.seq.is_waiting_for_visibility());
        assert!(!h.seq.is_autoplaying());

        h.seq.set_visible(true);
        assert!(h.seq.is_autoplaying());
        h.run_for(Duration::from_secs(10));
        assert_eq!(h.revealed().len(), 3);
    }

    #[test]
    fn test_manual_start_behavior_does_not_autostart() {
        let mut h = Harness::new(&THREE, StartBehavior::Manually);
        h.seq.set_visible(true);
        h.seq.attach();
        h.run_for(Duration::from_secs(5));

        assert!(h.revealed().is_empty());
        assert!(!h.seq.is_waiting_for_visibility());
        assert_eq!(h.seq.active_index(), None);
    }

    #[test]
    fn test_scenario_step_mid_typing_forces_completion() {
        let mut h = Harness::new(&THREE, StartBehavior::Manually);
        h.seq.set_visible(true);

        h.seq.step();
        h.pump();
        assert_eq!(h.seq.active_index(), Some(0));
        assert_eq!(h.states()[0], VisualState::TypingAnimation);

        h.run_for(ms(100));
        h.seq.step();
        // Unit 0 completed immediately, without waiting for its delay.
        assert_eq!(h.states()[0], VisualState::Revealed);
        assert_eq!(h.revealed(), vec![(0, ms(100))]);

        // Unit 1 starts with zero delay.
        h.pump();
        assert_eq!(h.seq.active_index(), Some(1));
        assert_eq!(h.states()[1], VisualState::TypingAnimation);
        assert_eq!(h.states()[2], VisualState::Hidden);
    }

    #[test]
    fn test_manual_mode_pauses_after_each_reveal() {
        let mut h = Harness::new(&THREE, StartBehavior::Manually);
        h.seq.set_visible(true);
        h.seq.step();
        h.run_for(Duration::from_secs(10));

        assert_eq!(h.revealed().len(), 1);
        assert_eq!(h.states()[1], VisualState::Hidden);
        assert!(!h.seq.has_pending_advance());
    }

    #[test]
    fn test_step_before_anything_begins_at_zero() {
        let mut h = Harness::new(&THREE, StartBehavior::Manually);
        h.seq.step();
        h.pump();
        assert_eq!(h.seq.active_index(), Some(0));
    }

    #[test]
    fn test_stepping_past_last_is_noop() {
        let mut h = Harness::new(&["a", "b"], StartBehavior::Manually);
        for _ in 0..5 {
            h.seq.step();
            h.pump();
        }
        assert_eq!(h.seq.active_index(), Some(1));
        assert!(!h.seq.has_pending_advance());
        assert_eq!(h.ended(), 1);
    }

    #[test]
    fn test_end_fires_for_manual_step_reveal() {
        let mut h = Harness::new(&["only"], StartBehavior::Manually);
        h.seq.step();
        h.run_for(Duration::from_secs(1));
        assert_eq!(h.ended(), 1);
        assert!(h.seq.has_ended());
    }

    #[test]
    fn test_scenario_reset_mid_sequence() {
        let mut h = Harness::new(&THREE, StartBehavior::Manually);
        h.seq.set_visible(true);
        h.seq.start();
        // Unit 1 is mid-typing: 240ms typing + 500ms gap + 100ms.
        h.run_for(compute_typing_delay(6) + ms(600));
        assert_eq!(h.seq.active_index(), Some(1));
        assert_eq!(h.states()[1], VisualState::TypingAnimation);

        h.seq.reset();
        assert_eq!(h.seq.active_index(), None);
        assert!(!h.seq.is_autoplaying());
        assert!(h.states().iter().all(|s| *s == VisualState::Hidden));
        assert_eq!(h.seq.pending_timers(), 0);

        let before = h.revealed().len();
        h.run_for(Duration::from_secs(10));
        assert_eq!(h.revealed().len(), before);
        assert!(h.states().iter().all(|s| *s == VisualState::Hidden));
    }

    #[test]
    fn test_reset_with_auto_start_replays_from_start() {
        let mut h = Harness::new(&THREE, StartBehavior::Auto);
        h.seq.set_visible(true);
        h.seq.attach();
        h.run_for(Duration::from_secs(10));
        assert_eq!(h.ended(), 1);

        h.seq.reset();
        assert!(h.seq.is_autoplaying());
        h.run_for(Duration::from_secs(10));
        let indices: Vec<usize> = h.revealed().iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 1, 2, 0, 1, 2]);
        assert_eq!(h.ended(), 2);
    }

    #[test]
    fn test_reset_twice_is_idempotent() {
        let mut h = Harness::new(&THREE, StartBehavior::Manually);
        h.seq.set_visible(true);
        h.seq.start();
        h.run_for(ms(300));

        h.seq.reset();
        let once = (
            h.seq.active_index(),
            h.seq.is_autoplaying(),
            h.states(),
            h.seq.pending_timers(),
        );
        h.seq.reset();
        let twice = (
            h.seq.active_index(),
            h.seq.is_autoplaying(),
            h.states(),
            h.seq.pending_timers(),
        );
        assert_eq!(once, twice);
        assert_eq!(once.0, None);
    }

    #[test]
    fn test_reset_before_visibility_cancels_start() {
        let mut h = Harness::new(&THREE, StartBehavior::Manually);
        h.seq.start();
        assert!(h.seq.is_waiting_for_visibility());

        h.seq.reset();
        h.seq.set_visible(true);
        h.run_for(Duration::from_secs(10));

        assert!(h.revealed().is_empty());
        assert!(!h.seq.is_autoplaying());
    }

    #[test]
    fn test_scenario_empty_list() {
        let mut h = Harness::new(&[], StartBehavior::Auto);
        h.seq.set_visible(true);
        h.seq.attach();
        h.seq.start();
        h.seq.step();
        h.seq.toggle_autoplay();
        h.run_for(Duration::from_secs(1));

        assert!(h.seq.is_empty());
        assert_eq!(h.seq.active_index(), None);
        assert_eq!(h.ended(), 0);
        assert_eq!(h.seq.pending_timers(), 0);
    }

    #[test]
    fn test_scenario_toggle_twice_restores_state() {
        let mut h = Harness::new(&THREE, StartBehavior::Manually);
        h.seq.set_visible(true);
        let original = h.seq.is_autoplaying();

        h.seq.toggle_autoplay();
        assert_ne!(h.seq.is_autoplaying(), original);
        h.seq.toggle_autoplay();
        assert_eq!(h.seq.is_autoplaying(), original);
    }

    #[test]
    fn test_stop_cancels_pending_advance() {
        let mut h = Harness::new(&THREE, StartBehavior::Auto);
        h.seq.set_visible(true);
        h.seq.attach();
        // Inside the 500ms gap after unit 0.
        h.run_for(compute_typing_delay(6) + ms(100));
        assert!(h.seq.has_pending_advance());

        h.seq.stop();
        assert!(!h.seq.has_pending_advance());
        h.run_for(Duration::from_secs(10));
        assert_eq!(h.seq.active_index(), Some(0));
    }

    #[test]
    fn test_stop_completes_active_unit() {
        let mut h = Harness::new(&THREE, StartBehavior::Auto);
        h.seq.set_visible(true);
        h.seq.attach();
        h.run_for(ms(10));
        assert_eq!(h.states()[0], VisualState::TypingAnimation);

        h.seq.stop();
        assert_eq!(h.states()[0], VisualState::Revealed);
        assert_eq!(h.seq.pending_timers(), 0);
    }

    #[test]
    fn test_toggle_resumes_after_active_unit() {
        let mut h = Harness::new(&THREE, StartBehavior::Auto);
        h.seq.set_visible(true);
        h.seq.attach();
        h.run_for(ms(10));
        h.seq.toggle_autoplay();
        assert!(!h.seq.is_autoplaying());

        h.seq.toggle_autoplay();
        h.run_for(Duration::from_secs(10));
        let indices: Vec<usize> = h.revealed().iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_play_while_stepped_unit_types_waits_for_completion() {
        let mut h = Harness::new(&THREE, StartBehavior::Manually);
        h.seq.set_visible(true);
        h.seq.step();
        h.run_for(ms(10));
        h.seq.toggle_autoplay();
        h.pump();

        assert!(h.seq.is_autoplaying());
        assert_eq!(h.seq.active_index(), Some(0));
        assert_eq!(
            h.states(),
            vec![VisualState::TypingAnimation, VisualState::Hidden, VisualState::Hidden]
        );

        let d0 = compute_typing_delay(6);
        let d1 = compute_typing_delay(24);
        let mut unit1_started = None;
        let end = h.seq.now() + Duration::from_secs(10);
        while h.seq.now() < end {
            let typing = h.seq.units().iter().filter(|unit| unit.is_typing()).count();
            assert!(typing <= 1, "two units typing at {:?}", h.seq.now());
            if let Some(started) = h.seq.units()[1].typing_started_at() {
                assert_eq!(*unit1_started.get_or_insert(started), started);
            }
            h.run_for(ms(5));
        }

        let unit1_start = d0 + DELAY_BETWEEN_MESSAGES;
        assert_eq!(unit1_started, Some(unit1_start));
        let revealed = h.revealed();
        assert_eq!(revealed[0], (0, d0));
        assert_eq!(revealed[1], (1, unit1_start + d1));
        assert_eq!(revealed.len(), 3);
        assert_eq!(h.ended(), 1);
    }

    #[test]
    fn test_at_most_one_pending_advance() {
        let mut h = Harness::new(&THREE, StartBehavior::Manually);
        h.seq.show_unit(0, ms(100));
        h.seq.show_unit(1, ms(50));
        h.seq.show_unit(2, ms(10));
        assert_eq!(h.seq.pending_timers(), 1);

        h.run_for(ms(200));
        assert_eq!(h.seq.active_index(), Some(2));
        assert_eq!(h.states()[0], VisualState::Hidden);
    }

    #[test]
    fn test_show_unit_out_of_range_is_noop() {
        let mut h = Harness::new(&THREE, StartBehavior::Manually);
        h.seq.show_unit(3, Duration::ZERO);
        h.seq.show_unit(usize::MAX, Duration::ZERO);
        assert_eq!(h.seq.pending_timers(), 0);
    }

    #[test]
    fn test_active_index_is_monotonic() {
        let mut h = Harness::new(&THREE, StartBehavior::Manually);
        h.seq.show_unit(2, Duration::ZERO);
        h.pump();
        h.seq.show_unit(0, Duration::ZERO);
        h.pump();
        assert_eq!(h.seq.active_index(), Some(2));

        let mut last = h.seq.active_index();
        for _ in 0..4 {
            h.seq.step();
            h.pump();
            assert!(h.seq.active_index() >= last);
            last = h.seq.active_index();
        }
    }

    #[test]
    fn test_fast_forward_reveals_rest_without_timers() {
        let mut h = Harness::new(&THREE, StartBehavior::Auto);
        h.seq.set_visible(true);
        h.seq.attach();
        h.run_for(ms(10));

        h.seq.fast_forward();

        assert!(h.states().iter().all(|s| *s == VisualState::Revealed));
        assert_eq!(h.seq.active_index(), Some(2));
        assert!(!h.seq.is_autoplaying());
        assert_eq!(h.seq.pending_timers(), 0);
        assert_eq!(h.ended(), 1);
        let indices: Vec<usize> = h.revealed().iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 1, 2]);

        // Nothing left to do afterwards.
        h.seq.fast_forward();
        assert_eq!(h.revealed().len(), 3);
        assert_eq!(h.ended(), 1);
    }

    #[test]
    fn test_announcements_follow_reveals() {
        let mut h = Harness::new(&["ping"], StartBehavior::Auto);
        h.seq.set_visible(true);
        h.seq.attach();
        h.run_for(Duration::from_secs(1));
        assert_eq!(
            *h.reads.lock().unwrap(),
            vec!["New message: ping".to_string()]
        );
    }
}
