//! Worker notification dispatch
//!
//! One [`NotificationRouter`] serves one transport identity. Its dispatch loop
//! drains the channel inbox in arrival order, updates the state store and
//! re-emits to the own listener set and then to the observer set.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::channel::{Notification, NotificationReceiver};
use crate::error::NotificationError;
use crate::events::{EventEmitter, TransportEvent};
use crate::state::TransportStateStore;
use crate::types::{SctpState, TraceEventData};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SctpStateChangeData {
    sctp_state: SctpState,
}

#[derive(Debug, Clone)]
pub struct NotificationRouter {
    transport_id: String,
    store: Arc<TransportStateStore>,
    emitter: Arc<EventEmitter>,
    observer: Arc<EventEmitter>,
}

impl NotificationRouter {
    pub fn new(
        transport_id: impl Into<String>,
        store: Arc<TransportStateStore>,
        emitter: Arc<EventEmitter>,
        observer: Arc<EventEmitter>,
    ) -> Self {
        Self {
            transport_id: transport_id.into(),
            store,
            emitter,
            observer,
        }
    }

    /// Apply one notification
    ///
    /// Notifications arriving after the store was sealed are dropped.
    pub fn handle_notification(&self, notification: Notification) -> Result<(), NotificationError> {
        if self.store.is_sealed() {
            debug!(
                "dropping \"{}\" notification for closed transport {}",
                notification.event, self.transport_id
            );
            return Ok(());
        }

        match notification.event.as_str() {
            "sctpstatechange" => {
                let SctpStateChangeData { sctp_state } =
                    decode(&notification.event, notification.data)?;
                if self.store.apply_sctp_state_change(sctp_state) {
                    self.emit(TransportEvent::SctpStateChange(sctp_state));
                }
                Ok(())
            }
            "trace" => {
                let trace: TraceEventData = decode(&notification.event, notification.data)?;
                self.emit(TransportEvent::Trace(trace));
                Ok(())
            }
            _ => Err(NotificationError::UnknownEvent(notification.event)),
        }
    }

    /// Apply one notification, logging anything that could not be handled
    pub fn dispatch(&self, notification: Notification) {
        if let Err(e) = self.handle_notification(notification) {
            error!("ignoring notification for transport {}: {}", self.transport_id, e);
        }
    }

    /// Run the dispatch loop until the channel ends the subscription
    pub fn spawn(self, handle: &Handle, mut inbox: NotificationReceiver) -> JoinHandle<()> {
        handle.spawn(async move {
            while let Some(notification) = inbox.recv().await {
                self.dispatch(notification);
            }
            debug!("notification inbox closed for transport {}", self.transport_id);
        })
    }

    fn emit(&self, event: TransportEvent) {
        let emitted = self.store.while_open(|| {
            self.emitter.safe_emit(&event);
            self.observer.safe_emit(&event);
        });
        if emitted.is_none() {
            debug!(
                "transport {} closed before \"{}\" could be emitted",
                self.transport_id,
                event.name()
            );
        }
    }
}

fn decode<T: for<'de> Deserialize<'de>>(event: &str, data: Value) -> Result<T, NotificationError> {
    serde_json::from_value(data).map_err(|e| NotificationError::InvalidPayload {
        event: event.to_string(),
        reason: e.to_string(),
    })
}
