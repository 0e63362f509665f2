//! Plain RTP transport proxy for the rvoip stack
//!
//! This crate provides the in-process side of a plain (non-ICE, non-DTLS)
//! RTP/RTCP transport whose real state lives in an external media worker. The
//! worker is reached through a [`Channel`] carrying requests and per-identity
//! notifications; [`MemoryChannel`] is an in-process implementation.
//!
//! # Components
//!
//! - [`TransportStateStore`] - mirrored tuples and SCTP state
//! - [`NotificationRouter`] - relays worker notifications to listeners
//! - [`PlainTransport`] - requests, capability guards and close handling
//! - [`EventEmitter`] - ordered listener sets (own and observer)

pub mod channel;
pub mod config;
pub mod error;
pub mod events;
pub mod state;
pub mod transport;
pub mod types;

pub use channel::{Channel, MemoryChannel, Notification, NotificationReceiver, RequestHandler};
pub use config::ChannelConfig;
pub use error::{ChannelError, NotificationError, Result, TransportError};
pub use events::{EventEmitter, EventKind, ListenerId, TransportEvent};
pub use state::{TransportRecord, TransportStateStore};
pub use transport::{NotificationRouter, PlainTransport, PlainTransportParams, TransportBase};
pub use types::{
    ConnectParams, ConnectResponse, ConsumeParams, ConsumerInfo, PlainTransportData,
    SctpParameters, SctpState, TraceDirection, TraceEventData, TraceEventType,
    TransportInternal, TransportProtocol, TransportTuple,
};

/// Re-export of common types for easier use
pub mod prelude {
    pub use crate::{
        Channel, ChannelConfig, ChannelError, ConnectParams, ConsumeParams, EventKind,
        MemoryChannel, PlainTransport, PlainTransportData, PlainTransportParams,
        RequestHandler, SctpParameters, SctpState, TransportError, TransportEvent,
        TransportInternal, TransportProtocol, TransportTuple,
    };
}
