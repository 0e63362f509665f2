//! Plain RTP/RTCP transport
//!
//! A `PlainTransport` is the in-process face of a plain (no ICE, no DTLS)
//! transport living inside the media worker. It mirrors the worker state,
//! forwards requests and relays the worker's `sctpstatechange` and `trace`
//! notifications.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use serde_json::{json, Value};
//! use rvoip_plain_transport::prelude::*;
//!
//! # async fn example() -> rvoip_plain_transport::Result<()> {
//! let channel = Arc::new(MemoryChannel::new(Arc::new(
//!     |_method: &str, _internal: &Value, _data: Option<&Value>| -> Result<Value, String> {
//!         Ok(json!({ "tuple": { "localIp": "0.0.0.0", "localPort": 5000,
//!                               "remoteIp": "10.0.0.2", "remotePort": 6000,
//!                               "protocol": "udp" } }))
//!     },
//! )));
//!
//! let transport = PlainTransport::new(PlainTransportParams {
//!     internal: TransportInternal::new("router-1", "transport-1"),
//!     data: PlainTransportData::new(TransportTuple::new("0.0.0.0", 5000, TransportProtocol::Udp)),
//!     channel,
//!     app_data: Value::Null,
//! })?;
//!
//! transport.observer().on(EventKind::Close, |_| println!("transport closed"));
//! transport.connect(ConnectParams::new("10.0.0.2", 6000)).await?;
//! transport.close();
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde_json::Value;
use tokio::runtime::Handle;
use tracing::debug;

use super::base::TransportBase;
use super::notifications::NotificationRouter;
use crate::channel::Channel;
use crate::error::{ChannelError, Result, TransportError};
use crate::events::EventEmitter;
use crate::state::{TransportRecord, TransportStateStore};
use crate::types::{
    ConnectParams, ConnectResponse, ConsumeParams, ConsumerInfo, PlainTransportData,
    SctpParameters, SctpState, TraceEventType, TransportInternal, TransportTuple,
};

/// Everything needed to build a [`PlainTransport`]
pub struct PlainTransportParams {
    pub internal: TransportInternal,
    /// Initial snapshot from the worker
    pub data: PlainTransportData,
    pub channel: Arc<dyn Channel>,
    pub app_data: Value,
}

pub struct PlainTransport {
    base: TransportBase,
    store: Arc<TransportStateStore>,
}

impl std::fmt::Debug for PlainTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlainTransport")
            .field("id", &self.id())
            .field("closed", &self.closed())
            .field("record", &self.store.snapshot())
            .finish()
    }
}

impl PlainTransport {
    /// Create the transport and start relaying its worker notifications
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(params: PlainTransportParams) -> Result<Self> {
        let PlainTransportParams {
            internal,
            data,
            channel,
            app_data,
        } = params;
        debug!("constructor() [transport:{}]", internal.transport_id);

        let handle = Handle::try_current().map_err(|_| {
            TransportError::config("a tokio runtime is required to relay worker notifications")
        })?;

        let base = TransportBase::new(internal, channel, app_data);
        let store = Arc::new(TransportStateStore::initialize(data));

        let inbox = base.channel().subscribe(base.id())?;
        NotificationRouter::new(
            base.id(),
            store.clone(),
            base.emitter().clone(),
            base.observer().clone(),
        )
        .spawn(&handle, inbox);

        Ok(Self { base, store })
    }

    pub fn id(&self) -> &str {
        self.base.id()
    }

    pub fn router_id(&self) -> &str {
        self.base.router_id()
    }

    pub fn closed(&self) -> bool {
        self.base.closed()
    }

    pub fn app_data(&self) -> &Value {
        self.base.app_data()
    }

    pub fn rtcp_mux(&self) -> bool {
        self.store.rtcp_mux()
    }

    pub fn comedia(&self) -> bool {
        self.store.comedia()
    }

    pub fn multi_source(&self) -> bool {
        self.store.multi_source()
    }

    /// RTP tuple
    pub fn tuple(&self) -> TransportTuple {
        self.store.tuple()
    }

    /// RTCP tuple; absent when RTCP is muxed
    pub fn rtcp_tuple(&self) -> Option<TransportTuple> {
        self.store.rtcp_tuple()
    }

    pub fn sctp_parameters(&self) -> Option<SctpParameters> {
        self.store.sctp_parameters()
    }

    pub fn sctp_state(&self) -> Option<SctpState> {
        self.store.sctp_state()
    }

    pub fn snapshot(&self) -> TransportRecord {
        self.store.snapshot()
    }

    /// Own listener set
    pub fn events(&self) -> &EventEmitter {
        self.base.emitter()
    }

    /// Observer listener set for passive monitoring
    ///
    /// Emits `close`, `sctpstatechange` and `trace`.
    pub fn observer(&self) -> &EventEmitter {
        self.base.observer()
    }

    /// Close the transport
    pub fn close(&self) {
        if self.closed() {
            return;
        }
        self.store.seal_with(|| self.base.close());
    }

    /// The owning router was closed
    pub fn router_closed(&self) {
        if self.closed() {
            return;
        }
        self.store.seal_with(|| self.base.router_closed());
    }

    /// Worker statistics for this transport, returned as received
    pub async fn get_stats(&self) -> Result<Value> {
        self.base.get_stats().await
    }

    pub async fn dump(&self) -> Result<Value> {
        self.base.dump().await
    }

    pub async fn enable_trace_event(&self, types: &[TraceEventType]) -> Result<()> {
        self.base.enable_trace_event(types).await
    }

    /// Provide the remote endpoint
    ///
    /// On success both tuples are replaced from the worker reply. A reply that
    /// arrives after the transport closed is discarded.
    pub async fn connect(&self, params: ConnectParams) -> Result<()> {
        debug!("connect() [transport:{}]", self.id());

        let data = serde_json::to_value(&params)?;
        let reply = self.base.request("transport.connect", Some(data)).await?;
        let response: ConnectResponse =
            serde_json::from_value(reply).map_err(|e| ChannelError::InvalidResponse {
                method: "transport.connect".to_string(),
                reason: e.to_string(),
            })?;

        if !self
            .store
            .apply_connect_result(response.tuple, response.rtcp_tuple)
        {
            debug!("discarding connect reply for closed transport {}", self.id());
            return Err(TransportError::closed(self.id()));
        }
        Ok(())
    }

    /// Create a consumer; refused locally on multi-source transports
    pub async fn consume(&self, params: ConsumeParams) -> Result<ConsumerInfo> {
        if self.store.multi_source() {
            return Err(TransportError::config(
                "cannot call consume() with multiSource set",
            ));
        }
        self.base.consume(params).await
    }
}

impl Drop for PlainTransport {
    fn drop(&mut self) {
        if !self.closed() {
            self.base.channel().unsubscribe(self.id());
        }
    }
}
