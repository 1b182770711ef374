//! tether-core: collaborator contracts for the tether client sync layer
//!
//! This crate defines the seams between the connectivity health/recovery
//! subsystem (tether-health) and the three independently-failing resources
//! it coordinates. Production adapters and test fakes implement these
//! traits; tether-health only ever sees the contracts.
//!
//! # Main Entry Points
//!
//! - [`query`] - Key-addressed cache contract (invalidate/refetch/cancel)
//! - [`session`] - Current-session lookup (`None` means expired)
//! - [`realtime`] - Channel transport and per-channel subscribe
//! - [`api`] - Tagged network-boundary error type

pub mod api;
pub mod query;
pub mod realtime;
pub mod session;

pub use api::ApiError;
pub use query::{CacheError, QueryCache, QueryKey, QuerySelector};
pub use realtime::{ChannelState, RealtimeChannel, RealtimeClient, RealtimeError};
pub use session::{Session, SessionError, SessionProvider};
