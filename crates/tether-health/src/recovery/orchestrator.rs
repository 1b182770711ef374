use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tether_core::{QueryCache, QuerySelector, RealtimeClient, SessionProvider};

use crate::config::RecoveryPolicy;
use crate::events::HealthEventBus;
use crate::signals::PageSignal;

use super::errors::RecoveryError;
use super::throttle::{ThrottleGate, VisibilityTracker};

/// Callback reporting whether the session is now absent (expired).
/// Callers typically redirect to login or show an auth banner.
pub type SessionExpiredCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// The cross-resource recovery sequence, separated from trigger state so
/// spawned runs and the bus handler can hold their own cheap clone.
#[derive(Clone)]
struct RecoverySequence {
    cache: Arc<dyn QueryCache>,
    sessions: Arc<dyn SessionProvider>,
    realtime: Arc<dyn RealtimeClient>,
    on_session_expired: Option<SessionExpiredCallback>,
}

impl RecoverySequence {
    /// Steps, each awaited before the next:
    /// 1. Invalidate every active cache entry (mark stale, no refetch).
    /// 2. Re-derive the current session; report absence via the callback.
    /// 3. Idempotent realtime connect.
    /// 4. Subscribe every channel not already joined/joining.
    ///
    /// A failing step propagates immediately; later steps do not run.
    async fn run(&self) -> Result<(), RecoveryError> {
        info!(event = "health.recovery.sequence_started");

        self.cache.invalidate(QuerySelector::Active).await?;

        let session = self.sessions.current_session().await?;
        let expired = session.is_none();
        if let Some(callback) = &self.on_session_expired {
            callback(expired);
        }

        self.realtime.connect().await?;

        let mut resubscribed = 0usize;
        for channel in self.realtime.channels() {
            if channel.state().is_joined_or_joining() {
                continue;
            }
            channel.subscribe().await?;
            resubscribed += 1;
        }

        info!(
            event = "health.recovery.sequence_completed",
            session_expired = expired,
            resubscribed,
        );
        Ok(())
    }
}

/// Decides, from visibility/focus signals, when to run the full
/// cross-resource recovery sequence, and runs it without overlap within a
/// throttle window.
///
/// The sequence recovers three independently-failing resources in strict
/// order: cache (invalidate active entries), auth session (re-derive and
/// report expiry), realtime (connect, then re-subscribe channels that
/// dropped). Every step is idempotent, which is what makes the
/// fire-and-gate trigger safe; see [`ThrottleGate`].
pub struct RecoveryOrchestrator {
    seq: RecoverySequence,
    bus: HealthEventBus,
    policy: RecoveryPolicy,
    gate: Mutex<ThrottleGate>,
    visibility: Mutex<VisibilityTracker>,
}

impl RecoveryOrchestrator {
    pub fn new(
        cache: Arc<dyn QueryCache>,
        sessions: Arc<dyn SessionProvider>,
        realtime: Arc<dyn RealtimeClient>,
        bus: HealthEventBus,
        policy: RecoveryPolicy,
    ) -> Self {
        let gate = ThrottleGate::new(policy.throttle_window());
        Self {
            seq: RecoverySequence {
                cache,
                sessions,
                realtime,
                on_session_expired: None,
            },
            bus,
            policy,
            gate: Mutex::new(gate),
            visibility: Mutex::new(VisibilityTracker::new()),
        }
    }

    /// Report session expiry through `callback` after every recovery run.
    pub fn with_session_expired_callback(mut self, callback: SessionExpiredCallback) -> Self {
        self.seq.on_session_expired = Some(callback);
        self
    }

    fn gate(&self) -> MutexGuard<'_, ThrottleGate> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn visibility(&self) -> MutexGuard<'_, VisibilityTracker> {
        self.visibility
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Run the full recovery sequence now, bypassing triggers and
    /// throttling. Exposed for manual "retry now" UI actions.
    pub async fn recover_now(&self) -> Result<(), RecoveryError> {
        self.seq.run().await
    }

    /// Feed one visibility/focus signal through the trigger policy.
    ///
    /// - `Hidden` records the hide time; no recovery action.
    /// - `Visible` triggers only when the page was hidden at least the
    ///   policy minimum (inclusive). Brief tab switches are ignored, as is
    ///   a visible signal with no recorded hidden mark.
    /// - `Focused` always attempts a trigger.
    pub fn handle_signal(&self, signal: PageSignal) {
        match signal {
            PageSignal::Hidden => {
                self.visibility().mark_hidden(Instant::now());
            }
            PageSignal::Visible => {
                let hidden = self.visibility().take_hidden_duration(Instant::now());
                match hidden {
                    Some(duration) if duration >= self.policy.min_hidden() => {
                        self.try_trigger("visible");
                    }
                    Some(duration) => {
                        debug!(
                            event = "health.recovery.brief_hide_ignored",
                            hidden_ms = duration.as_millis() as u64,
                        );
                    }
                    None => {}
                }
            }
            PageSignal::Focused => {
                self.try_trigger("focus");
            }
        }
    }

    /// Fire-and-gate: pass the leading-edge throttle, then spawn the
    /// recovery sequence without awaiting it. Triggers inside an open
    /// window are dropped silently. The window closes by clock, so a run
    /// that outlives it may overlap the next one. Accepted, since every
    /// step is idempotent.
    fn try_trigger(&self, reason: &'static str) {
        if !self.gate().try_open(Instant::now()) {
            debug!(event = "health.recovery.trigger_throttled", reason);
            return;
        }

        info!(event = "health.recovery.triggered", reason);
        let seq = self.seq.clone();
        tokio::spawn(async move {
            if let Err(e) = seq.run().await {
                warn!(
                    event = "health.recovery.run_failed",
                    error = %e,
                    "Recovery run failed; next trigger after the throttle window may retry"
                );
            }
        });
    }

    /// Register this orchestrator's sequence as the bus's global recovery
    /// handler. Last registration wins.
    pub fn attach(&self) {
        let seq = self.seq.clone();
        self.bus.register_recovery_handler(Some(Arc::new(move || {
            let seq = seq.clone();
            Box::pin(async move { seq.run().await })
        })));
    }

    /// Clear the bus recovery slot and discard pending trigger state.
    ///
    /// Prevents new triggers only; an already-started sequence is not
    /// aborted.
    pub fn detach(&self) {
        self.bus.register_recovery_handler(None);
        self.gate().reset();
        *self.visibility() = VisibilityTracker::new();
    }

    /// Consume signals until cancelled, with attach/detach bracketing.
    ///
    /// The embedding runtime forwards its visibility-change and focus
    /// events into `signals`; cancel the token (or drop the sender) to
    /// tear down.
    pub async fn run(
        &self,
        mut signals: mpsc::UnboundedReceiver<PageSignal>,
        cancel: CancellationToken,
    ) {
        self.attach();
        info!(event = "health.recovery.loop_started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                signal = signals.recv() => match signal {
                    Some(signal) => self.handle_signal(signal),
                    None => break,
                },
            }
        }

        self.detach();
        info!(event = "health.recovery.loop_stopped");
    }
}
