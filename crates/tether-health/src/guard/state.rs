use std::sync::Arc;

use tokio::time::Instant;
use tracing::debug;

use tether_core::{ApiError, CacheError, QueryCache, QueryKey, QuerySelector};

use crate::config::GuardPolicy;

use super::classify::{ErrorView, classify};

/// What the owning query reports on one render tick.
#[derive(Debug, Clone, Default)]
pub struct QueryObservation {
    pub is_loading: bool,
    pub is_error: bool,
    pub error: Option<ApiError>,
}

impl QueryObservation {
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }

    pub fn failed(error: ApiError) -> Self {
        Self {
            is_loading: false,
            is_error: true,
            error: Some(error),
        }
    }

    pub fn ready() -> Self {
        Self::default()
    }
}

/// Presentation state derived from the latest observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryGuardState {
    /// No observation yet.
    Idle,
    /// Request in flight. `slow` adds the "taking too long" affordance
    /// with a manual retry action.
    Loading { slow: bool },
    /// Request failed; view carries the classification and actions.
    Error(ErrorView),
    /// Neither loading nor error; render the wrapped content.
    Ready,
}

/// Optional follow-up invoked after a manual retry is issued.
pub type RetryFollowUp = Arc<dyn Fn() + Send + Sync>;

/// Presentation contract for one query's lifecycle.
///
/// Feed it the owning query's `{is_loading, is_error, error}` every render
/// tick via [`observe`](Self::observe); it derives loading / slow /
/// error / ready, tracking wall-clock time spent loading for the slow
/// cutoff. The manual [`retry`](Self::retry) path exercises the cache's
/// own primitives and has no retry limit or backoff: each retry is a
/// single attempt whose result re-enters the same state machine.
pub struct RetryGuard {
    key: Option<QueryKey>,
    cache: Arc<dyn QueryCache>,
    policy: GuardPolicy,
    on_retry: Option<RetryFollowUp>,
    loading_since: Option<Instant>,
    state: RetryGuardState,
}

impl RetryGuard {
    pub fn new(cache: Arc<dyn QueryCache>, key: Option<QueryKey>, policy: GuardPolicy) -> Self {
        Self {
            key,
            cache,
            policy,
            on_retry: None,
            loading_since: None,
            state: RetryGuardState::Idle,
        }
    }

    /// Invoke `follow_up` after each manual retry is issued.
    pub fn with_follow_up(mut self, follow_up: RetryFollowUp) -> Self {
        self.on_retry = Some(follow_up);
        self
    }

    /// Last derived state ([`RetryGuardState::Idle`] before any
    /// observation).
    pub fn state(&self) -> &RetryGuardState {
        &self.state
    }

    /// Derive the presentation state from the query's current report.
    ///
    /// Loading precedence matches the render contract: a query that is
    /// loading shows the loading state even if a previous attempt failed.
    /// Leaving loading for any reason clears the slow-cutoff mark.
    pub fn observe(&mut self, observation: &QueryObservation) -> RetryGuardState {
        let now = Instant::now();

        self.state = if observation.is_loading {
            let since = *self.loading_since.get_or_insert(now);
            let slow = now.duration_since(since) >= self.policy.slow_after();
            RetryGuardState::Loading { slow }
        } else {
            self.loading_since = None;
            if observation.is_error {
                RetryGuardState::Error(classify(observation.error.as_ref()))
            } else {
                RetryGuardState::Ready
            }
        };

        self.state.clone()
    }

    /// Manual retry: cancel any in-flight request for this key, mark it
    /// stale, and refetch it among active entries only, then invoke the
    /// follow-up.
    ///
    /// Safe to invoke repeatedly; overlapping retries coalesce in the
    /// cache's single-flight behavior. Without a key only the follow-up
    /// runs.
    pub async fn retry(&self) -> Result<(), CacheError> {
        if let Some(key) = &self.key {
            debug!(event = "health.guard.retry_started", key = %key);
            self.cache.cancel(key).await?;
            self.cache.invalidate(QuerySelector::Key(key.clone())).await?;
            self.cache
                .refetch(QuerySelector::Key(key.clone()), true)
                .await?;
        }
        if let Some(follow_up) = &self.on_retry {
            follow_up();
        }
        Ok(())
    }
}
