pub mod bus;
pub mod instrument;
pub mod types;

// Re-export commonly used types
pub use bus::{HealthEventBus, HealthListener, RecoveryHandler, Subscription};
pub use instrument::observe_request;
pub use types::{HealthSnapshot, HealthStatus};
