use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::recovery::RecoveryError;

use super::types::HealthSnapshot;

/// Observer invoked synchronously with every published snapshot.
pub type HealthListener = Arc<dyn Fn(&HealthSnapshot) + Send + Sync>;

/// The single global recovery routine. At most one is registered at a
/// time; last registration wins.
pub type RecoveryHandler =
    Arc<dyn Fn() -> BoxFuture<'static, Result<(), RecoveryError>> + Send + Sync>;

struct BusInner {
    last: Option<HealthSnapshot>,
    listeners: Vec<(u64, HealthListener)>,
    next_listener_id: u64,
    recovery: Option<RecoveryHandler>,
}

/// Single source of truth for last-known API health, plus the hookup point
/// between UI observers and the one active recovery routine.
///
/// Cheaply cloneable handle over shared interior state. Construct one at
/// process start and pass it explicitly to everything that needs it; there
/// is deliberately no module-level global.
#[derive(Clone)]
pub struct HealthEventBus {
    inner: Arc<Mutex<BusInner>>,
}

impl Default for HealthEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthEventBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(BusInner {
                last: None,
                listeners: Vec::new(),
                next_listener_id: 0,
                recovery: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BusInner> {
        // A listener that panicked inside publish() poisons the mutex; the
        // registry itself is still consistent, so keep going.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the stored snapshot and synchronously notify every
    /// registered listener.
    ///
    /// Listeners are invoked over a copy of the registry taken at publish
    /// time, so subscribing or unsubscribing from within a callback is
    /// safe. A panicking listener is logged and skipped; the remaining
    /// listeners still run.
    pub fn publish(&self, snapshot: HealthSnapshot) {
        let to_notify: Vec<HealthListener> = {
            let mut inner = self.lock();
            inner.last = Some(snapshot.clone());
            inner
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect()
        };

        for listener in to_notify {
            if catch_unwind(AssertUnwindSafe(|| listener(&snapshot))).is_err() {
                warn!(
                    event = "health.bus.listener_panicked",
                    status = %snapshot.status,
                    "Health listener panicked during publish; remaining listeners still notified"
                );
            }
        }
    }

    /// The most recently published snapshot, if any.
    pub fn last(&self) -> Option<HealthSnapshot> {
        self.lock().last.clone()
    }

    /// Add a listener. The returned [`Subscription`] removes it again;
    /// dropping the subscription without calling
    /// [`Subscription::unsubscribe`] leaves the listener registered.
    pub fn subscribe(&self, listener: HealthListener) -> Subscription {
        let mut inner = self.lock();
        let id = inner.next_listener_id;
        inner.next_listener_id += 1;
        inner.listeners.push((id, listener));
        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Set or clear the single recovery-handler slot. Last writer wins; no
    /// queuing of multiple handlers.
    pub fn register_recovery_handler(&self, handler: Option<RecoveryHandler>) {
        let registered = handler.is_some();
        self.lock().recovery = handler;
        debug!(event = "health.bus.recovery_handler_set", registered);
    }

    /// Invoke the registered recovery handler, if any.
    ///
    /// Resolves with `Ok(())` and no side effects when the slot is empty.
    /// A failing handler's error is returned unwrapped; this call never
    /// suppresses it.
    pub async fn trigger_global_recovery(&self) -> Result<(), RecoveryError> {
        let handler = self.lock().recovery.clone();
        match handler {
            Some(handler) => handler().await,
            None => Ok(()),
        }
    }
}

/// Capability to remove one listener from the bus registry.
pub struct Subscription {
    id: u64,
    inner: Weak<Mutex<BusInner>>,
}

impl Subscription {
    /// Remove the listener. Safe to call at any time, including while a
    /// publish is in flight (the in-flight notification still completes
    /// over its registry copy).
    pub fn unsubscribe(self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}
