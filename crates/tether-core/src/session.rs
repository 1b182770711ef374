use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// An authenticated session as reported by the session provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Errors surfaced by a session provider implementation.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session lookup failed: {0}")]
    LookupFailed(String),

    #[error("session provider unavailable: {0}")]
    Unavailable(String),
}

/// Contract for the authentication/session provider.
///
/// `current_session` re-derives state from the provider; it is read-only
/// and safe to call repeatedly. `Ok(None)` means "expired or never
/// authenticated", which is an answer rather than a failure. `Err` means
/// the provider itself could not be reached.
pub trait SessionProvider: Send + Sync {
    fn current_session(&self) -> BoxFuture<'_, Result<Option<Session>, SessionError>>;
}
