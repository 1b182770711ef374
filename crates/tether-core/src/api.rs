use serde::{Deserialize, Serialize};

/// Tagged error constructed once at the network boundary.
///
/// Downstream classification (auth vs timeout vs generic) pattern-matches
/// this closed shape instead of probing an untyped error value. `reasons`
/// carries server-side validation detail when the backend provides it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasons: Option<Vec<String>>,
}

impl ApiError {
    /// Error carrying an HTTP status code.
    pub fn with_status(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code: Some(status_code),
            message: message.into(),
            reasons: None,
        }
    }

    /// Transport-level failure with no response status.
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            message: message.into(),
            reasons: None,
        }
    }

    /// Request aborted before completion (caller cancellation or deadline).
    pub fn aborted(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            message: format!("aborted: {}", message.into()),
            reasons: None,
        }
    }

    pub fn with_reasons(mut self, reasons: Vec<String>) -> Self {
        self.reasons = Some(reasons);
        self
    }

    /// True for 401/403, which only re-authentication can fix.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status_code, Some(401) | Some(403))
    }

    /// True when the message carries a recognizable timeout phrase.
    pub fn is_timeout(&self) -> bool {
        let message = self.message.to_lowercase();
        message.contains("timed out") || message.contains("timeout")
    }

    /// True when the request was cancelled rather than failed.
    pub fn is_aborted(&self) -> bool {
        self.message.to_lowercase().starts_with("aborted")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status_code {
            Some(status) => write!(f, "[{}] {}", status, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ApiError {}
