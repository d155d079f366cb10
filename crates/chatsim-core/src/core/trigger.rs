//! One-shot playback trigger.
//!
//! `OnceVisible` tracks whether the chat container is visible and hands out
//! subscriptions that fire a single time, the first moment the container is
//! visible. Subscribing while already visible fires on the next check.
//! A subscription can be cancelled before it fires; a cancelled subscription
//! never fires.

use std::collections::BTreeSet;

/// Identifies a pending "once visible" subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Subscription(u64);

/// Visibility gate with one-shot subscriptions.
#[derive(Debug, Default)]
pub struct OnceVisible {
    visible: bool,
    next_id: u64,
    waiting: BTreeSet<Subscription>,
}

impl OnceVisible {
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            ..Self::default()
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Registers a new one-shot subscription.
    pub fn subscribe(&mut self) -> Subscription {
        let subscription = Subscription(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.waiting.insert(subscription);
        subscription
    }

    /// Cancels a subscription. Returns true if it had not fired yet.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.waiting.remove(&subscription)
    }

    /// Updates visibility and returns the subscriptions that fire now.
    pub fn set_visible(&mut self, visible: bool) -> Vec<Subscription> {
        self.visible = visible;
        self.take_fired()
    }

    /// Drains all waiting subscriptions if the container is visible.
    pub fn take_fired(&mut self) -> Vec<Subscription> {
        if !self.visible {
            return Vec::new();
        }
        std::mem::take(&mut self.waiting).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_when_becoming_visible() {
        let mut gate = OnceVisible::new(false);
        let sub = gate.subscribe();

        assert!(gate.take_fired().is_empty());
        assert_eq!(gate.set_visible(true), vec![sub]);
        // Staying visible or flapping does not fire again.
        assert!(gate.set_visible(false).is_empty());
        assert!(gate.set_visible(true).is_empty());
    }

    #[test]
    fn test_subscribe_while_visible_fires_on_next_check() {
        let mut gate = OnceVisible::new(true);
        let sub = gate.subscribe();
        assert_eq!(gate.take_fired(), vec![sub]);
        assert!(gate.take_fired().is_empty());
    }

    #[test]
    fn test_cancelled_subscription_never_fires() {
        let mut gate = OnceVisible::new(false);
        let sub = gate.subscribe();
        assert!(gate.unsubscribe(sub));
        assert!(gate.set_visible(true).is_empty());
        assert!(!gate.unsubscribe(sub));
    }

    #[test]
    fn test_subscriptions_are_distinct() {
        let mut gate = OnceVisible::new(false);
        let first = gate.subscribe();
        let second = gate.subscribe();
        assert_ne!(first, second);
        gate.unsubscribe(first);
        assert_eq!(gate.set_visible(true), vec![second]);
    }
}
