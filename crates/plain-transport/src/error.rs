//! Error types for the plain transport library

use thiserror::Error;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors reported by the worker channel
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The worker answered the request with an error
    #[error("Request {method} rejected by worker: {reason}")]
    Rejected { method: String, reason: String },

    /// No reply arrived in time
    #[error("Request {method} timed out after {timeout_ms} ms")]
    Timeout { method: String, timeout_ms: u64 },

    /// The channel itself is gone
    #[error("Channel closed")]
    Closed,

    /// The worker reply could not be decoded
    #[error("Invalid response to {method}: {reason}")]
    InvalidResponse { method: String, reason: String },

    /// Somebody already listens for notifications of this identity
    #[error("Notification target {target_id} already has a subscriber")]
    DuplicateSubscription { target_id: String },
}

/// Errors that can occur while operating a transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// A local precondition was violated; the worker was not contacted
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The transport is closed
    #[error("Transport closed: {transport_id}")]
    Closed { transport_id: String },

    /// Channel or worker failure, propagated unmodified
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// A request payload could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TransportError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a closed-transport error
    pub fn closed(transport_id: impl Into<String>) -> Self {
        Self::Closed {
            transport_id: transport_id.into(),
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

/// Anomalies found while decoding worker notifications.
///
/// These never reach callers; the dispatch loop logs them and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    #[error("unknown event \"{0}\"")]
    UnknownEvent(String),

    #[error("invalid payload for \"{event}\": {reason}")]
    InvalidPayload { event: String, reason: String },
}
