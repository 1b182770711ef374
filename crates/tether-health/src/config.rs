//! Threshold policies for the health subsystem.
//!
//! Plain structs with serde defaults so thresholds are injectable from
//! host configuration and overridable in tests. Durations are stored as
//! milliseconds on the wire and exposed as `Duration` accessors.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_min_hidden_ms() -> u64 {
    3_000
}

const fn default_recovery_throttle_ms() -> u64 {
    500
}

const fn default_refetch_throttle_ms() -> u64 {
    400
}

const fn default_slow_after_ms() -> u64 {
    10_000
}

const fn default_stuck_after_ms() -> u64 {
    10_000
}

/// Trigger thresholds for the recovery orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryPolicy {
    /// Minimum hidden duration before a visible transition triggers
    /// recovery. Brief tab switches below this are ignored.
    #[serde(default = "default_min_hidden_ms")]
    pub min_hidden_ms: u64,
    /// Leading-edge throttle window; at most one recovery run initiated
    /// per window.
    #[serde(default = "default_recovery_throttle_ms")]
    pub throttle_ms: u64,
}

impl Default for RecoveryPolicy {
    fn default() -> Self {
        Self {
            min_hidden_ms: default_min_hidden_ms(),
            throttle_ms: default_recovery_throttle_ms(),
        }
    }
}

impl RecoveryPolicy {
    pub fn min_hidden(&self) -> Duration {
        Duration::from_millis(self.min_hidden_ms)
    }

    pub fn throttle_window(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}

/// Throttle for the passive bulk-refetch reflex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefetchPolicy {
    #[serde(default = "default_refetch_throttle_ms")]
    pub throttle_ms: u64,
}

impl Default for RefetchPolicy {
    fn default() -> Self {
        Self {
            throttle_ms: default_refetch_throttle_ms(),
        }
    }
}

impl RefetchPolicy {
    pub fn throttle_window(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}

/// Slow-loading cutoff for the per-query retry guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardPolicy {
    /// Continuous loading beyond this shows the "taking too long"
    /// affordance.
    #[serde(default = "default_slow_after_ms")]
    pub slow_after_ms: u64,
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            slow_after_ms: default_slow_after_ms(),
        }
    }
}

impl GuardPolicy {
    pub fn slow_after(&self) -> Duration {
        Duration::from_millis(self.slow_after_ms)
    }
}

/// Stuck-query cutoff for the health monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorPolicy {
    /// A key fetching continuously beyond this counts as stuck.
    #[serde(default = "default_stuck_after_ms")]
    pub stuck_after_ms: u64,
}

impl Default for MonitorPolicy {
    fn default() -> Self {
        Self {
            stuck_after_ms: default_stuck_after_ms(),
        }
    }
}

impl MonitorPolicy {
    pub fn stuck_after(&self) -> Duration {
        Duration::from_millis(self.stuck_after_ms)
    }
}
