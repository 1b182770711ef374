use serde::{Deserialize, Serialize};

/// Visibility/focus signal from the embedding runtime.
///
/// The host environment (browser shell, native window, test harness) feeds
/// these into [`crate::RecoveryOrchestrator::handle_signal`] and
/// [`crate::PassiveRefetchTrigger::handle_signal`], either directly or via
/// their `run` loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSignal {
    /// The page became hidden (tab switched away, window minimized).
    Hidden,
    /// The page became visible again.
    Visible,
    /// The window gained input focus.
    Focused,
}

impl std::fmt::Display for PageSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageSignal::Hidden => write!(f, "hidden"),
            PageSignal::Visible => write!(f, "visible"),
            PageSignal::Focused => write!(f, "focused"),
        }
    }
}
