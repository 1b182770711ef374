//! Passive bulk-refetch reflex.
//!
//! Redundant coverage alongside the recovery orchestrator: even where the
//! full orchestrator is not mounted, coming back to the page still
//! refreshes active data. Cache-only; no session or channel awareness.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tether_core::{CacheError, QueryCache, QuerySelector};

use crate::config::RefetchPolicy;
use crate::recovery::ThrottleGate;
use crate::signals::PageSignal;

/// Mark everything stale, then refetch entries backing a mounted consumer.
async fn refresh_active_data(cache: &dyn QueryCache) -> Result<(), CacheError> {
    debug!(event = "health.refetch.refresh_started");
    cache.invalidate(QuerySelector::All).await?;
    cache.refetch(QuerySelector::All, true).await?;
    debug!(event = "health.refetch.refresh_completed");
    Ok(())
}

/// Broad invalidate + refetch of all active cache entries on any visible
/// or focus signal, behind its own leading-edge throttle.
///
/// Unlike the orchestrator there is no hidden-duration gate: every
/// visible/focus signal is eligible, subject only to the throttle.
pub struct PassiveRefetchTrigger {
    cache: Arc<dyn QueryCache>,
    gate: Mutex<ThrottleGate>,
}

impl PassiveRefetchTrigger {
    pub fn new(cache: Arc<dyn QueryCache>, policy: RefetchPolicy) -> Self {
        Self {
            cache,
            gate: Mutex::new(ThrottleGate::new(policy.throttle_window())),
        }
    }

    fn gate(&self) -> MutexGuard<'_, ThrottleGate> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one bulk refresh immediately, bypassing the throttle.
    pub async fn refresh_active_data(&self) -> Result<(), CacheError> {
        refresh_active_data(&*self.cache).await
    }

    /// Feed one signal through the throttle. `Hidden` is ignored.
    pub fn handle_signal(&self, signal: PageSignal) {
        match signal {
            PageSignal::Hidden => {}
            PageSignal::Visible | PageSignal::Focused => {
                if !self.gate().try_open(Instant::now()) {
                    debug!(event = "health.refetch.trigger_throttled", signal = %signal);
                    return;
                }
                let cache = Arc::clone(&self.cache);
                tokio::spawn(async move {
                    if let Err(e) = refresh_active_data(&*cache).await {
                        warn!(event = "health.refetch.refresh_failed", error = %e);
                    }
                });
            }
        }
    }

    /// Consume signals until cancelled. Discards pending throttle state on
    /// exit.
    pub async fn run(
        &self,
        mut signals: mpsc::UnboundedReceiver<PageSignal>,
        cancel: CancellationToken,
    ) {
        info!(event = "health.refetch.loop_started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                signal = signals.recv() => match signal {
                    Some(signal) => self.handle_signal(signal),
                    None => break,
                },
            }
        }

        self.gate().reset();
        info!(event = "health.refetch.loop_stopped");
    }
}
