//! Worker channel
//!
//! The channel carries requests to the media worker and pushes worker
//! notifications back, keyed by the identity of the object they concern.
//! Notifications for one identity arrive in the order the worker sent them.

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::ChannelError;

pub use memory::{MemoryChannel, RequestHandler};

/// Unsolicited message from the worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl Notification {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }
}

/// Inbox of notifications for one identity; closes when the subscription ends
pub type NotificationReceiver = mpsc::UnboundedReceiver<Notification>;

/// Request/response and publish/subscribe link to the worker
#[async_trait]
pub trait Channel: Send + Sync {
    /// Send a request and wait for its reply
    async fn request(
        &self,
        method: &str,
        internal: Value,
        data: Option<Value>,
    ) -> Result<Value, ChannelError>;

    /// Start receiving notifications for `target_id`
    ///
    /// Only one subscriber per identity is allowed.
    fn subscribe(&self, target_id: &str) -> Result<NotificationReceiver, ChannelError>;

    /// Stop receiving notifications for `target_id`
    fn unsubscribe(&self, target_id: &str);
}
