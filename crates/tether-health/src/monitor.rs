//! Green/yellow/red health aggregation for a status indicator.
//!
//! Combines the bus's last API snapshot, a session-expiry flag, realtime
//! channel states and stuck-query tracking into one report a status
//! widget can render, with a "retry now" action wired to global recovery.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::info;

use tether_core::{QueryCache, QueryKey, RealtimeClient, SessionError, SessionProvider};

use crate::config::MonitorPolicy;
use crate::events::{HealthEventBus, HealthSnapshot, HealthStatus};
use crate::recovery::RecoveryError;

/// Overall verdict: red needs user action, yellow is degraded, green is
/// healthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthColor {
    Green,
    Yellow,
    Red,
}

/// A query fetching continuously past the stuck cutoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StuckQuery {
    pub key: QueryKey,
    pub fetching_for_ms: u64,
}

/// One aggregated health evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub color: HealthColor,
    pub api_ok: bool,
    pub session_expired: bool,
    pub realtime_ok: bool,
    pub stuck_queries: Vec<StuckQuery>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_api: Option<HealthSnapshot>,
}

/// Session expiry or a failing API turns the indicator red; a dropped
/// channel or a stuck query only degrades it to yellow.
fn color_for(session_expired: bool, api_ok: bool, realtime_ok: bool, stuck: usize) -> HealthColor {
    if session_expired || !api_ok {
        HealthColor::Red
    } else if !realtime_ok || stuck > 0 {
        HealthColor::Yellow
    } else {
        HealthColor::Green
    }
}

pub struct HealthMonitor {
    bus: HealthEventBus,
    cache: Arc<dyn QueryCache>,
    sessions: Arc<dyn SessionProvider>,
    realtime: Arc<dyn RealtimeClient>,
    policy: MonitorPolicy,
    session_expired: Mutex<bool>,
    fetching_since: Mutex<HashMap<QueryKey, Instant>>,
}

impl HealthMonitor {
    pub fn new(
        bus: HealthEventBus,
        cache: Arc<dyn QueryCache>,
        sessions: Arc<dyn SessionProvider>,
        realtime: Arc<dyn RealtimeClient>,
        policy: MonitorPolicy,
    ) -> Self {
        Self {
            bus,
            cache,
            sessions,
            realtime,
            policy,
            session_expired: Mutex::new(false),
            fetching_since: Mutex::new(HashMap::new()),
        }
    }

    fn session_expired(&self) -> MutexGuard<'_, bool> {
        self.session_expired
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn fetching_since(&self) -> MutexGuard<'_, HashMap<QueryKey, Instant>> {
        self.fetching_since
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-derive session state from the provider and remember the verdict.
    /// Returns true when the session is absent (expired).
    pub async fn revalidate_session(&self) -> Result<bool, SessionError> {
        let session = self.sessions.current_session().await?;
        let expired = session.is_none();
        *self.session_expired() = expired;
        Ok(expired)
    }

    /// Update stuck-query tracking against the cache's in-flight keys and
    /// return the queries past the cutoff. A key stops being tracked the
    /// moment it is no longer fetching.
    fn evaluate_stuck(&self, now: Instant) -> Vec<StuckQuery> {
        let fetching: Vec<QueryKey> = self.cache.fetching_keys();
        let mut since_map = self.fetching_since();

        since_map.retain(|key, _| fetching.contains(key));

        let mut stuck = Vec::new();
        for key in fetching {
            let since = *since_map.entry(key.clone()).or_insert(now);
            let elapsed = now.duration_since(since);
            if elapsed >= self.policy.stuck_after() {
                stuck.push(StuckQuery {
                    key,
                    fetching_for_ms: elapsed.as_millis() as u64,
                });
            }
        }
        stuck
    }

    fn realtime_ok(&self) -> bool {
        self.realtime
            .channels()
            .iter()
            .all(|channel| channel.state().is_joined_or_joining())
    }

    /// Evaluate everything and produce one report.
    pub fn report(&self) -> HealthReport {
        let last_api = self.bus.last();
        let api_ok = !matches!(
            last_api.as_ref().map(|s| s.status),
            Some(HealthStatus::Error)
        );
        let session_expired = *self.session_expired();
        let realtime_ok = self.realtime_ok();
        let stuck_queries = self.evaluate_stuck(Instant::now());

        HealthReport {
            color: color_for(session_expired, api_ok, realtime_ok, stuck_queries.len()),
            api_ok,
            session_expired,
            realtime_ok,
            stuck_queries,
            last_api,
        }
    }

    /// Manual "retry now": run global recovery through the bus, then
    /// refresh the session verdict.
    pub async fn retry_now(&self) -> Result<(), RecoveryError> {
        info!(event = "health.monitor.retry_now");
        self.bus.trigger_global_recovery().await?;
        self.revalidate_session().await?;
        Ok(())
    }
}
