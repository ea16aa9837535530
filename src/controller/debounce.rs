//! Trailing-edge debouncing of recomputes.
use std::time::{Duration, Instant};

/// Delays an action until there has been no new request for a fixed interval.
///
/// Each request replaces the pending deadline rather than queueing another one, so at most one
/// action is ever owed.
#[derive(Debug, Clone)]
pub struct Debouncer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet interval
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    /// The quiet interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Request the action, pushing back any pending deadline
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    /// Whether an action is owed
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop any pending action
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether the pending action is now due.
    ///
    /// The deadline is left in place; call [`Debouncer::cancel`] once the action has succeeded.
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }
}
