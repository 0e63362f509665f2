//! Mirrored transport state
//!
//! [`TransportStateStore`] holds the worker-authoritative state of one plain
//! transport. Every change goes through a named entry point tied to a worker
//! reply, a worker notification or the local close path. Once the transport
//! closes the store is sealed and rejects further changes.
//!
//! Event emission is serialized against sealing through an emit gate, so no
//! notification-driven event can reach listeners after the close event.

use parking_lot::{ReentrantMutex, RwLock};
use tracing::warn;

use crate::types::{PlainTransportData, SctpParameters, SctpState, TransportTuple};

/// Snapshot of the mutable transport state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRecord {
    pub tuple: TransportTuple,
    pub rtcp_tuple: Option<TransportTuple>,
    pub sctp_parameters: Option<SctpParameters>,
    pub sctp_state: Option<SctpState>,
}

#[derive(Debug)]
struct StoreInner {
    record: TransportRecord,
    sealed: bool,
}

#[derive(Debug)]
pub struct TransportStateStore {
    rtcp_mux: bool,
    comedia: bool,
    multi_source: bool,
    inner: RwLock<StoreInner>,
    emit_gate: ReentrantMutex<()>,
}

impl TransportStateStore {
    /// Build the store from the worker's initial snapshot
    pub fn initialize(data: PlainTransportData) -> Self {
        let PlainTransportData {
            rtcp_mux,
            comedia,
            multi_source,
            tuple,
            mut rtcp_tuple,
            sctp_parameters,
            mut sctp_state,
        } = data;

        if rtcp_mux && rtcp_tuple.is_some() {
            warn!("dropping RTCP tuple of an rtcp-mux transport");
            rtcp_tuple = None;
        }
        match (sctp_parameters.is_some(), sctp_state.is_some()) {
            (true, false) => sctp_state = Some(SctpState::New),
            (false, true) => {
                warn!("dropping SCTP state of a transport without SCTP parameters");
                sctp_state = None;
            }
            _ => {}
        }

        Self {
            rtcp_mux,
            comedia,
            multi_source,
            inner: RwLock::new(StoreInner {
                record: TransportRecord {
                    tuple,
                    rtcp_tuple,
                    sctp_parameters,
                    sctp_state,
                },
                sealed: false,
            }),
            emit_gate: ReentrantMutex::new(()),
        }
    }

    /// Replace both tuples from a `transport.connect` reply
    pub fn apply_connect_result(
        &self,
        tuple: TransportTuple,
        rtcp_tuple: Option<TransportTuple>,
    ) -> bool {
        let mut inner = self.inner.write();
        if inner.sealed {
            return false;
        }
        inner.record.tuple = tuple;
        inner.record.rtcp_tuple = if self.rtcp_mux { None } else { rtcp_tuple };
        true
    }

    /// Record a worker-reported SCTP state; false if nothing changed
    pub fn apply_sctp_state_change(&self, state: SctpState) -> bool {
        let mut inner = self.inner.write();
        if inner.sealed {
            return false;
        }
        let current = inner.record.sctp_state;
        match current {
            None => {
                warn!("ignoring SCTP state {} on a transport without SCTP", state);
                false
            }
            Some(SctpState::Closed) => false,
            Some(_) => {
                inner.record.sctp_state = Some(state);
                true
            }
        }
    }

    /// Move SCTP to `closed` (if enabled) and seal the store
    ///
    /// Returns true if the SCTP state changed.
    pub fn force_closed(&self) -> bool {
        let mut inner = self.inner.write();
        inner.sealed = true;
        let current = inner.record.sctp_state;
        match current {
            Some(state) if !state.is_closed() => {
                inner.record.sctp_state = Some(SctpState::Closed);
                true
            }
            _ => false,
        }
    }

    /// Run `f` under the emit gate if the store is still open
    ///
    /// Returns `None` without running `f` once the store is sealed. The gate is
    /// reentrant, so a listener running inside `f` may close the transport.
    pub fn while_open<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        let _gate = self.emit_gate.lock();
        if self.is_sealed() {
            return None;
        }
        Some(f())
    }

    /// Seal the store and run `f` (the close emission) under the emit gate
    pub fn seal_with<R>(&self, f: impl FnOnce() -> R) -> R {
        let _gate = self.emit_gate.lock();
        self.force_closed();
        f()
    }

    pub fn tuple(&self) -> TransportTuple {
        self.inner.read().record.tuple.clone()
    }

    pub fn rtcp_tuple(&self) -> Option<TransportTuple> {
        self.inner.read().record.rtcp_tuple.clone()
    }

    pub fn sctp_parameters(&self) -> Option<SctpParameters> {
        self.inner.read().record.sctp_parameters
    }

    pub fn sctp_state(&self) -> Option<SctpState> {
        self.inner.read().record.sctp_state
    }

    /// Consistent copy of all mutable fields
    pub fn snapshot(&self) -> TransportRecord {
        self.inner.read().record.clone()
    }

    pub fn rtcp_mux(&self) -> bool {
        self.rtcp_mux
    }

    pub fn comedia(&self) -> bool {
        self.comedia
    }

    pub fn multi_source(&self) -> bool {
        self.multi_source
    }

    pub fn is_sealed(&self) -> bool {
        self.inner.read().sealed
    }
}
