//! Debounce slots keyed by input category.
//!
//! Each category has a single pending deadline. Scheduling again before it
//! fires restarts the timer. Time is passed in by the caller, so the host
//! event loop decides when to poll.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Inputs that share a debounce slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputCategory {
    /// Id, rectangle and distance fields
    Geometry,
    /// Enable state of the turning point field
    TurningPoint,
}

impl InputCategory {
    pub fn delay(self) -> Duration {
        match self {
            Self::Geometry => Duration::from_millis(100),
            Self::TurningPoint => Duration::from_millis(50),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Debouncer<K> {
    pending: HashMap<K, Instant>,
}

impl<K: Copy + Eq + Hash> Debouncer<K> {
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }

    /// Arm `key` to fire `delay` after `now`, replacing any pending deadline.
    pub fn schedule(&mut self, key: K, now: Instant, delay: Duration) {
        self.pending.insert(key, now + delay);
    }

    pub fn cancel(&mut self, key: K) -> bool {
        self.pending.remove(&key).is_some()
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.pending.contains_key(&key)
    }

    /// Earliest pending deadline, for scheduling the next poll.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().min().copied()
    }

    /// Remove and return every key whose deadline has passed, earliest first.
    pub fn due(&mut self, now: Instant) -> Vec<K> {
        let mut fired: Vec<(Instant, K)> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, deadline)| (*deadline, *key))
            .collect();
        fired.sort_by_key(|(deadline, _)| *deadline);

        for (_, key) in &fired {
            self.pending.remove(key);
        }
        fired.into_iter().map(|(_, key)| key).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<K: Copy + Eq + Hash> Default for Debouncer<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn fires_after_delay() {
        let t0 = Instant::now();
        let mut d = Debouncer::new();
        d.schedule(InputCategory::Geometry, t0, InputCategory::Geometry.delay());

        assert!(d.due(t0 + 99 * MS).is_empty());
        assert_eq!(d.due(t0 + 100 * MS), vec![InputCategory::Geometry]);
        assert!(!d.is_pending(InputCategory::Geometry));
    }

    #[test]
    fn keystroke_restarts_timer() {
        let t0 = Instant::now();
        let mut d = Debouncer::new();
        d.schedule(InputCategory::Geometry, t0, 100 * MS);
        d.schedule(InputCategory::Geometry, t0 + 80 * MS, 100 * MS);

        assert!(d.due(t0 + 120 * MS).is_empty());
        assert_eq!(d.due(t0 + 180 * MS), vec![InputCategory::Geometry]);
    }

    #[test]
    fn categories_are_independent() {
        let t0 = Instant::now();
        let mut d = Debouncer::new();
        d.schedule(InputCategory::Geometry, t0, InputCategory::Geometry.delay());
        d.schedule(InputCategory::TurningPoint, t0, InputCategory::TurningPoint.delay());

        assert_eq!(d.next_deadline(), Some(t0 + 50 * MS));
        assert_eq!(d.due(t0 + 60 * MS), vec![InputCategory::TurningPoint]);
        assert!(d.is_pending(InputCategory::Geometry));
        assert_eq!(
            d.due(t0 + 200 * MS),
            vec![InputCategory::Geometry]
        );
    }

    #[test]
    fn cancel_and_clear() {
        let t0 = Instant::now();
        let mut d = Debouncer::new();
        d.schedule(InputCategory::Geometry, t0, MS);
        assert!(d.cancel(InputCategory::Geometry));
        assert!(!d.cancel(InputCategory::Geometry));

        d.schedule(InputCategory::TurningPoint, t0, MS);
        d.clear();
        assert!(d.due(t0 + 10 * MS).is_empty());
    }
}
