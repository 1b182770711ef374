use tether_core::{CacheError, RealtimeError, SessionError};

/// A recovery-sequence step failure.
///
/// Deliberately not swallowed anywhere in this crate: a failing step
/// propagates out of `recover_now` / `trigger_global_recovery` to the
/// caller so infrastructure failures stay visible.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum RecoveryError {
    #[error("cache invalidation failed: {0}")]
    Cache(#[from] CacheError),

    #[error("session check failed: {0}")]
    Session(#[from] SessionError),

    #[error("realtime recovery failed: {0}")]
    Realtime(#[from] RealtimeError),
}
