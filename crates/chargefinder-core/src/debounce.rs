//! A cancellable, last-write-wins delay used to debounce search input.
//!
//! Time is read through [`Clock`] so the controller can be driven by a real
//! clock in a shell and by [`ManualClock`] in tests.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Nominal quiet period before a typed search is applied.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

#[derive(Debug)]
struct Pending<T> {
    value: T,
    due_at: Instant,
}

/// Holds at most one scheduled value. Scheduling again replaces it and
/// restarts the delay.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value` to become due `delay` after `now`, superseding any
    /// pending value.
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            due_at: now + self.delay,
        });
    }

    /// Drop the pending value, if any. Returns whether one was dropped.
    pub fn cancel_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Take the pending value if its delay has elapsed at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        if self.pending.as_ref().is_some_and(|p| now >= p.due_at) {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }

    /// Take the pending value regardless of its deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_not_due_before_delay() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(DEFAULT_SEARCH_DEBOUNCE);
        debouncer.schedule("tok", clock.now());

        clock.advance(Duration::from_millis(299));
        assert_eq!(debouncer.take_due(clock.now()), None);
        assert!(debouncer.is_pending());

        clock.advance(Duration::from_millis(1));
        assert_eq!(debouncer.take_due(clock.now()), Some("tok"));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.take_due(clock.now()), None);
    }

    #[test]
    fn rescheduling_replaces_value_and_restarts_delay() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.schedule("t", clock.now());
        clock.advance(Duration::from_millis(200));
        debouncer.schedule("to", clock.now());
        clock.advance(Duration::from_millis(200));

        assert_eq!(debouncer.take_due(clock.now()), None, "delay restarted");
        clock.advance(Duration::from_millis(100));
        assert_eq!(debouncer.take_due(clock.now()), Some("to"));
    }

    #[test]
    fn cancel_drops_pending_value() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        assert!(!debouncer.cancel_pending());
        debouncer.schedule(1, clock.now());
        assert!(debouncer.cancel_pending());
        clock.advance(Duration::from_secs(1));
        assert_eq!(debouncer.take_due(clock.now()), None);
    }

    #[test]
    fn flush_ignores_deadline() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(Duration::from_secs(60));
        debouncer.schedule(7, clock.now());
        assert_eq!(debouncer.flush(), Some(7));
        assert_eq!(debouncer.flush(), None);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        let start = other.now();
        clock.advance(Duration::from_millis(5));
        assert_eq!(other.now() - start, Duration::from_millis(5));
    }
}
