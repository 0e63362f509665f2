//! Channel configuration
//!
//! ```rust
//! use rvoip_plain_transport::config::ChannelConfig;
//! use std::time::Duration;
//!
//! let config = ChannelConfig::new().with_request_timeout(Duration::from_secs(2));
//! assert_eq!(config.request_timeout_ms, 2000);
//!
//! let config = ChannelConfig::from_json(r#"{ "requestTimeoutMs": 500 }"#).unwrap();
//! assert_eq!(config.request_timeout(), Duration::from_millis(500));
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default time a request may wait for its worker reply
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;

/// Settings for a worker channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelConfig {
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl ChannelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}
