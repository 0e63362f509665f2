//! Generic transport procedures
//!
//! [`TransportBase`] carries what every transport kind shares: its identity,
//! the closed flag, the own and observer listener sets, and the requests that
//! are the same for all transports (close, consume, stats, dump, tracing).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::channel::Channel;
use crate::error::{Result, TransportError};
use crate::events::{EventEmitter, TransportEvent};
use crate::types::{ConsumeParams, ConsumerInfo, TraceEventType, TransportInternal};

pub struct TransportBase {
    internal: TransportInternal,
    channel: Arc<dyn Channel>,
    app_data: Value,
    closed: AtomicBool,
    emitter: Arc<EventEmitter>,
    observer: Arc<EventEmitter>,
    /// Held for the duration of each worker request
    in_flight: Mutex<()>,
}

impl std::fmt::Debug for TransportBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportBase")
            .field("internal", &self.internal)
            .field("closed", &self.closed())
            .finish()
    }
}

impl TransportBase {
    pub fn new(internal: TransportInternal, channel: Arc<dyn Channel>, app_data: Value) -> Self {
        Self {
            internal,
            channel,
            app_data,
            closed: AtomicBool::new(false),
            emitter: Arc::new(EventEmitter::new("transport")),
            observer: Arc::new(EventEmitter::new("observer")),
            in_flight: Mutex::new(()),
        }
    }

    pub fn id(&self) -> &str {
        &self.internal.transport_id
    }

    pub fn router_id(&self) -> &str {
        &self.internal.router_id
    }

    pub fn internal(&self) -> &TransportInternal {
        &self.internal
    }

    pub fn channel(&self) -> &Arc<dyn Channel> {
        &self.channel
    }

    pub fn app_data(&self) -> &Value {
        &self.app_data
    }

    pub fn closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn emitter(&self) -> &Arc<EventEmitter> {
        &self.emitter
    }

    pub fn observer(&self) -> &Arc<EventEmitter> {
        &self.observer
    }

    /// Send a request targeting this transport
    ///
    /// Fails without touching the channel once the transport is closed.
    pub async fn request(&self, method: &str, data: Option<Value>) -> Result<Value> {
        self.request_with_internal(method, serde_json::to_value(&self.internal)?, data)
            .await
    }

    async fn request_with_internal(
        &self,
        method: &str,
        internal: Value,
        data: Option<Value>,
    ) -> Result<Value> {
        if self.closed() {
            return Err(TransportError::closed(self.id()));
        }
        let _guard = self.in_flight.lock().await;
        if self.closed() {
            return Err(TransportError::closed(self.id()));
        }
        Ok(self.channel.request(method, internal, data).await?)
    }

    /// Flip to closed; only the first caller gets true
    fn mark_closed(&self) -> bool {
        self.closed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Application-initiated close
    pub fn close(&self) -> bool {
        if !self.mark_closed() {
            return false;
        }
        debug!("close() [transport:{}]", self.id());

        self.channel.unsubscribe(self.id());
        self.release_worker_side();

        self.emitter.safe_emit(&TransportEvent::Close);
        self.observer.safe_emit(&TransportEvent::Close);
        true
    }

    /// The owning router went away; the worker already dropped this transport
    pub fn router_closed(&self) -> bool {
        if !self.mark_closed() {
            return false;
        }
        debug!("routerClosed() [transport:{}]", self.id());

        self.channel.unsubscribe(self.id());

        self.emitter.safe_emit(&TransportEvent::RouterClose);
        self.observer.safe_emit(&TransportEvent::Close);
        true
    }

    /// Fire-and-forget `transport.close`; failures are only logged
    fn release_worker_side(&self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(
                "no runtime to send transport.close for transport {}",
                self.id()
            );
            return;
        };
        let internal = match serde_json::to_value(&self.internal) {
            Ok(internal) => internal,
            Err(e) => {
                warn!("transport.close not sent: {}", e);
                return;
            }
        };
        let channel = self.channel.clone();
        let transport_id = self.id().to_string();
        handle.spawn(async move {
            if let Err(e) = channel.request("transport.close", internal, None).await {
                warn!("transport.close failed [transport:{}]: {}", transport_id, e);
            }
        });
    }

    /// Create a consumer for `params.producer_id` on this transport
    pub async fn consume(&self, params: ConsumeParams) -> Result<ConsumerInfo> {
        debug!("consume() [transport:{}]", self.id());

        let consumer_id = Uuid::new_v4().to_string();
        let internal = json!({
            "routerId": self.internal.router_id,
            "transportId": self.internal.transport_id,
            "consumerId": consumer_id,
            "producerId": params.producer_id,
        });
        let data = json!({
            "rtpCapabilities": params.rtp_capabilities,
            "paused": params.paused,
            "appData": params.app_data,
        });

        let reply = self
            .request_with_internal("transport.consume", internal, Some(data))
            .await?;

        Ok(ConsumerInfo {
            id: consumer_id,
            producer_id: params.producer_id,
            data: reply,
        })
    }

    pub async fn dump(&self) -> Result<Value> {
        debug!("dump() [transport:{}]", self.id());
        self.request("transport.dump", None).await
    }

    pub async fn get_stats(&self) -> Result<Value> {
        debug!("getStats() [transport:{}]", self.id());
        self.request("transport.getStats", None).await
    }

    /// Ask the worker to emit `trace` notifications of the given kinds
    pub async fn enable_trace_event(&self, types: &[TraceEventType]) -> Result<()> {
        debug!("enableTraceEvent() [transport:{}]", self.id());
        let data = json!({ "types": types });
        self.request("transport.enableTraceEvent", Some(data)).await?;
        Ok(())
    }
}
