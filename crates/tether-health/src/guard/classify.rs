use serde::{Deserialize, Serialize};

use tether_core::ApiError;

const AUTH_TITLE: &str = "session expired or insufficient permission";
const GENERIC_TITLE: &str = "failed to load data";
const AUTH_DETAIL: &str = "Your session may have expired. Log in again and retry.";
const TIMEOUT_DETAIL: &str = "request took too long";
const UNKNOWN_DETAIL: &str = "unknown error";

/// Renderable classification of one query failure.
///
/// Always offers at least one actionable next step: retry, plus login when
/// the failure is an auth failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorView {
    pub auth_error: bool,
    pub title: String,
    pub detail: String,
    pub offer_login: bool,
}

/// Classify an error by its carried status code and message.
///
/// 401/403 means re-authentication is the only fix; a timeout phrase gets
/// a distinct message; everything else falls back to the error's own text.
/// Never fails; absent fields coerce to fallbacks.
pub fn classify(error: Option<&ApiError>) -> ErrorView {
    let auth_error = error.map(ApiError::is_auth_error).unwrap_or(false);

    let detail = if auth_error {
        AUTH_DETAIL.to_string()
    } else if error.map(ApiError::is_timeout).unwrap_or(false) {
        TIMEOUT_DETAIL.to_string()
    } else {
        error
            .map(|e| e.message.trim())
            .filter(|m| !m.is_empty())
            .unwrap_or(UNKNOWN_DETAIL)
            .to_string()
    };

    ErrorView {
        auth_error,
        title: if auth_error { AUTH_TITLE } else { GENERIC_TITLE }.to_string(),
        detail,
        offer_login: auth_error,
    }
}
