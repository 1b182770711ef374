use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome class of an instrumented API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Error,
    Aborted,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Ok => write!(f, "ok"),
            HealthStatus::Error => write!(f, "error"),
            HealthStatus::Aborted => write!(f, "aborted"),
        }
    }
}

/// Last-known API health, produced each time an instrumented request
/// completes, errors or is aborted. Only the most recent snapshot is
/// retained; there is no history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub status: HealthStatus,
    pub duration_ms: u64,
    pub at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthSnapshot {
    pub fn now(status: HealthStatus, duration_ms: u64, message: Option<String>) -> Self {
        Self {
            status,
            duration_ms,
            at: Utc::now(),
            message,
        }
    }
}
