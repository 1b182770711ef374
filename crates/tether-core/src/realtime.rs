use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a realtime channel as reported by the transport.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelState {
    Closed,
    Errored,
    Joining,
    Joined,
    Leaving,
}

impl ChannelState {
    /// True when the channel needs no reconnect action.
    ///
    /// Recovery only distinguishes "already connecting/connected"
    /// (`Joined`, `Joining`) from everything else.
    pub fn is_joined_or_joining(&self) -> bool {
        matches!(self, ChannelState::Joined | ChannelState::Joining)
    }
}

impl std::fmt::Display for ChannelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelState::Closed => write!(f, "closed"),
            ChannelState::Errored => write!(f, "errored"),
            ChannelState::Joining => write!(f, "joining"),
            ChannelState::Joined => write!(f, "joined"),
            ChannelState::Leaving => write!(f, "leaving"),
        }
    }
}

/// Errors surfaced by the realtime transport.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum RealtimeError {
    #[error("realtime connect failed: {0}")]
    ConnectFailed(String),

    #[error("subscribe failed for channel {topic}: {message}")]
    SubscribeFailed { topic: String, message: String },
}

/// One realtime channel. Subscribe is issued per channel during recovery.
pub trait RealtimeChannel: Send + Sync {
    fn topic(&self) -> &str;

    fn state(&self) -> ChannelState;

    /// (Re-)issue the subscription for this channel.
    fn subscribe(&self) -> BoxFuture<'_, Result<(), RealtimeError>>;
}

/// Contract for the realtime channel transport.
pub trait RealtimeClient: Send + Sync {
    /// Ensure the transport is connected. Idempotent: a no-op when the
    /// socket is already up.
    fn connect(&self) -> BoxFuture<'_, Result<(), RealtimeError>>;

    /// Every channel currently known to the transport.
    fn channels(&self) -> Vec<Arc<dyn RealtimeChannel>>;
}
