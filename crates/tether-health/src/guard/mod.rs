pub mod classify;
pub mod state;

// Re-export commonly used types
pub use classify::ErrorView;
pub use state::{QueryObservation, RetryFollowUp, RetryGuard, RetryGuardState};
