//! Quiet-interval debouncing for search input
//!
//! Each controller owns one [`DebounceTimer`]; scheduling a dispatch
//! replaces whatever was pending, so at most one dispatch can fire per
//! quiet window, carrying the most recent term. The timer itself is a
//! plain state machine over [`Instant`]s; the async wait loop lives in
//! the controller.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Pending {
    term: String,
    due_at: Instant,
}

/// Single-instance quiet-interval timer owned by one controller.
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    quiet: Duration,
    pending: Option<Pending>,
}

impl DebounceTimer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Schedules a dispatch for `term` one quiet interval from now,
    /// discarding any dispatch that was already pending.
    pub fn schedule(&mut self, term: &str) {
        self.pending = Some(Pending {
            term: term.to_string(),
            due_at: Instant::now() + self.quiet,
        });
    }

    /// Drops the pending dispatch, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// Takes the pending term if its quiet interval has elapsed by `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<String> {
        if self.pending.as_ref().is_some_and(|p| now >= p.due_at) {
            self.pending.take().map(|p| p.term)
        } else {
            None
        }
    }

    /// Time left until the pending dispatch is due, `None` when nothing
    /// is scheduled. Zero once the dispatch is already due.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|p| p.due_at.saturating_duration_since(now))
    }
}
