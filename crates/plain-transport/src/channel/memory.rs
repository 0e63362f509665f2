//! In-process channel
//!
//! `MemoryChannel` hands requests to a [`RequestHandler`] standing in for the
//! worker and lets the caller push notifications with [`MemoryChannel::notify`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use super::{Channel, Notification, NotificationReceiver};
use crate::config::ChannelConfig;
use crate::error::ChannelError;

/// Worker side of a [`MemoryChannel`]
///
/// An `Err` reply becomes [`ChannelError::Rejected`] with the returned reason.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle_request(
        &self,
        method: &str,
        internal: &Value,
        data: Option<&Value>,
    ) -> Result<Value, String>;
}

#[async_trait]
impl<F> RequestHandler for F
where
    F: Fn(&str, &Value, Option<&Value>) -> Result<Value, String> + Send + Sync,
{
    async fn handle_request(
        &self,
        method: &str,
        internal: &Value,
        data: Option<&Value>,
    ) -> Result<Value, String> {
        (self)(method, internal, data)
    }
}

pub struct MemoryChannel {
    config: ChannelConfig,
    handler: Arc<dyn RequestHandler>,
    subscribers: DashMap<String, mpsc::UnboundedSender<Notification>>,
    requests: AtomicU64,
    closed: AtomicBool,
}

impl std::fmt::Debug for MemoryChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryChannel")
            .field("config", &self.config)
            .field("subscribers", &self.subscribers.len())
            .field("requests", &self.requests.load(Ordering::Relaxed))
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish()
    }
}

impl MemoryChannel {
    pub fn new(handler: Arc<dyn RequestHandler>) -> Self {
        Self::with_config(ChannelConfig::default(), handler)
    }

    pub fn with_config(config: ChannelConfig, handler: Arc<dyn RequestHandler>) -> Self {
        Self {
            config,
            handler,
            subscribers: DashMap::new(),
            requests: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Push a notification to the subscriber of `target_id`
    ///
    /// Returns false if nobody is subscribed.
    pub fn notify(&self, target_id: &str, event: &str, data: Value) -> bool {
        match self.subscribers.get(target_id) {
            Some(tx) => tx.send(Notification::new(event, data)).is_ok(),
            None => {
                trace!("no subscriber for notification \"{}\" on {}", event, target_id);
                false
            }
        }
    }

    /// Number of requests that reached the channel
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn has_subscriber(&self, target_id: &str) -> bool {
        self.subscribers.contains_key(target_id)
    }

    /// Shut the channel down; pending inboxes end and new requests fail
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!("closing memory channel");
        self.subscribers.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Channel for MemoryChannel {
    async fn request(
        &self,
        method: &str,
        internal: Value,
        data: Option<Value>,
    ) -> Result<Value, ChannelError> {
        if self.is_closed() {
            return Err(ChannelError::Closed);
        }
        self.requests.fetch_add(1, Ordering::SeqCst);
        trace!("request {} -> {}", method, internal);

        let reply = tokio::time::timeout(
            self.config.request_timeout(),
            self.handler.handle_request(method, &internal, data.as_ref()),
        )
        .await
        .map_err(|_| ChannelError::Timeout {
            method: method.to_string(),
            timeout_ms: self.config.request_timeout_ms,
        })?;

        reply.map_err(|reason| ChannelError::Rejected {
            method: method.to_string(),
            reason,
        })
    }

    fn subscribe(&self, target_id: &str) -> Result<NotificationReceiver, ChannelError> {
        if self.is_closed() {
            return Err(ChannelError::Closed);
        }
        match self.subscribers.entry(target_id.to_string()) {
            Entry::Occupied(_) => Err(ChannelError::DuplicateSubscription {
                target_id: target_id.to_string(),
            }),
            Entry::Vacant(entry) => {
                let (tx, rx) = mpsc::unbounded_channel();
                entry.insert(tx);
                Ok(rx)
            }
        }
    }

    fn unsubscribe(&self, target_id: &str) {
        self.subscribers.remove(target_id);
    }
}
