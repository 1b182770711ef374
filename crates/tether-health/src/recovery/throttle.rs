//! Small explicit trigger-state machines.
//!
//! Owned by the orchestrating components instead of living as captured
//! mutable closure state, so the open/closed invariant is testable in
//! isolation from event wiring.

use std::time::Duration;

use tokio::time::Instant;

/// Leading-edge throttle: the first trigger passes and opens a fixed
/// window; further triggers are dropped until the window elapses.
///
/// Purely time-based: the window closes by clock, never by completion of
/// whatever the trigger started. A long-running action can therefore
/// overlap the next allowed trigger; callers rely on idempotent actions,
/// not serialization.
#[derive(Debug)]
pub struct ThrottleGate {
    window: Duration,
    opened_at: Option<Instant>,
}

impl ThrottleGate {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            opened_at: None,
        }
    }

    /// Attempt to pass the gate at `now`. Returns true (and opens the
    /// window) when the gate is closed or the previous window has
    /// elapsed; false drops the trigger.
    pub fn try_open(&mut self, now: Instant) -> bool {
        if let Some(opened_at) = self.opened_at {
            if now.duration_since(opened_at) < self.window {
                return false;
            }
        }
        self.opened_at = Some(now);
        true
    }

    /// Discard any open window, as on teardown.
    pub fn reset(&mut self) {
        self.opened_at = None;
    }
}

/// Tracks when the page went hidden so the visible transition can measure
/// how long it was away.
#[derive(Debug, Default)]
pub struct VisibilityTracker {
    hidden_at: Option<Instant>,
}

impl VisibilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the moment the page became hidden. A repeated hidden signal
    /// keeps the earliest mark; the page has been away since then.
    pub fn mark_hidden(&mut self, now: Instant) {
        if self.hidden_at.is_none() {
            self.hidden_at = Some(now);
        }
    }

    /// How long the page was hidden, measured at the visible transition.
    /// Consumes the mark; returns `None` when no hidden signal was seen.
    pub fn take_hidden_duration(&mut self, now: Instant) -> Option<Duration> {
        self.hidden_at.take().map(|at| now.duration_since(at))
    }
}
