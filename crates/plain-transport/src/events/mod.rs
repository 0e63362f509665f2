//! Transport events
//!
//! A transport owns two [`EventEmitter`]s: its own listener set and the
//! observer set used for passive monitoring. Events always reach the own set
//! first.

pub mod emitter;

use serde::{Deserialize, Serialize};

use crate::types::{SctpState, TraceEventData};

pub use emitter::{EventEmitter, EventListener, ListenerId};

/// Events emitted by a transport
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// SCTP state reported by the worker
    SctpStateChange(SctpState),
    /// Trace record pushed by the worker
    Trace(TraceEventData),
    /// The owning router closed the transport
    RouterClose,
    /// The transport closed
    Close,
}

/// Discriminant of [`TransportEvent`], used to register listeners per event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    SctpStateChange,
    Trace,
    RouterClose,
    Close,
}

impl TransportEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            TransportEvent::SctpStateChange(_) => EventKind::SctpStateChange,
            TransportEvent::Trace(_) => EventKind::Trace,
            TransportEvent::RouterClose => EventKind::RouterClose,
            TransportEvent::Close => EventKind::Close,
        }
    }

    /// Event name as the worker and applications know it
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}

impl EventKind {
    pub fn name(self) -> &'static str {
        match self {
            EventKind::SctpStateChange => "sctpstatechange",
            EventKind::Trace => "trace",
            EventKind::RouterClose => "routerclose",
            EventKind::Close => "close",
        }
    }
}
