pub mod cache;
pub mod errors;
pub mod types;

// Re-export commonly used types
pub use cache::QueryCache;
pub use errors::CacheError;
pub use types::{QueryKey, QuerySelector};
