//! Deferred-call coalescing for bursty input events.
//!
//! Modeled as explicit window state machines over injected instants instead
//! of timer callbacks: a debounced window always yields the most recent
//! submission and drops the rest (each submission resets the deadline, which
//! is the cancellation); a throttle admits at most one call per interval and
//! drops intermediate ones.

use std::time::{Duration, Instant};

/// Coalesces a burst of submissions into the single most recent value,
/// released once the window has elapsed with no new submission.
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<T>,
    deadline: Option<Instant>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            deadline: None,
        }
    }

    /// Replace any pending value and reset the window deadline.
    pub fn submit(&mut self, value: T, now: Instant) {
        self.pending = Some(value);
        self.deadline = Some(now + self.window);
    }

    /// Yield the pending value once the window has elapsed; otherwise `None`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }
}

/// Caps invocation frequency: at most one admitted call per interval,
/// intermediate calls dropped.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last_admitted: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_admitted: None,
        }
    }

    pub fn allow(&mut self, now: Instant) -> bool {
        match self.last_admitted {
            Some(last) if now < last + self.interval => false,
            _ => {
                self.last_admitted = Some(now);
                true
            }
        }
    }
}
