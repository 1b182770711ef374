pub mod errors;
pub mod orchestrator;
pub mod throttle;

// Re-export commonly used types
pub use errors::RecoveryError;
pub use orchestrator::{RecoveryOrchestrator, SessionExpiredCallback};
pub use throttle::{ThrottleGate, VisibilityTracker};
