//! tether-health: connectivity health & recovery for cached-client apps
//!
//! Keeps a local request cache and a live realtime channel synchronized
//! with the backend despite network flakiness, tab suspension and session
//! expiry. Four cooperating pieces:
//!
//! - [`events`] - Shared last-known API health snapshot, observer registry
//!   and the single global recovery-handler slot
//! - [`recovery`] - Visibility/focus-driven full recovery sequence
//!   (cache + session + realtime) with leading-edge throttling
//! - [`refetch`] - Simpler bulk invalidate+refetch reflex on the same
//!   signals, independent of the orchestrator
//! - [`guard`] - Per-query loading/slow/error/ready presentation contract
//!   with a manual retry path
//! - [`monitor`] - Green/yellow/red aggregation for a status indicator
//!
//! All collaborators are injected through the tether-core traits; nothing
//! here owns a wire protocol or a global.

pub mod config;
pub mod events;
pub mod guard;
pub mod monitor;
pub mod recovery;
pub mod refetch;
pub mod signals;

pub use config::{GuardPolicy, MonitorPolicy, RecoveryPolicy, RefetchPolicy};
pub use events::{
    HealthEventBus, HealthSnapshot, HealthStatus, RecoveryHandler, Subscription, observe_request,
};
pub use guard::{ErrorView, QueryObservation, RetryGuard, RetryGuardState};
pub use monitor::{HealthColor, HealthMonitor, HealthReport, StuckQuery};
pub use recovery::{RecoveryError, RecoveryOrchestrator};
pub use refetch::PassiveRefetchTrigger;
pub use signals::PageSignal;
