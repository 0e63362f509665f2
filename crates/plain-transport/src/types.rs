//! Worker data types
//!
//! These types mirror the JSON the media worker sends and expects. Field names
//! follow the worker's camelCase convention on the wire.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Transport protocol of a tuple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportProtocol {
    Udp,
    Tcp,
}

/// Local/remote address association of an RTP or RTCP stream
///
/// Remote fields stay empty until the remote endpoint is learned, either through
/// [`connect`](crate::PlainTransport::connect) or by the worker itself (comedia).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportTuple {
    pub local_ip: String,
    pub local_port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_port: Option<u16>,
    pub protocol: TransportProtocol,
}

impl TransportTuple {
    /// Create a tuple with no remote endpoint
    pub fn new(local_ip: impl Into<String>, local_port: u16, protocol: TransportProtocol) -> Self {
        Self {
            local_ip: local_ip.into(),
            local_port,
            remote_ip: None,
            remote_port: None,
            protocol,
        }
    }

    /// Set the remote endpoint
    pub fn with_remote(mut self, remote_ip: impl Into<String>, remote_port: u16) -> Self {
        self.remote_ip = Some(remote_ip.into());
        self.remote_port = Some(remote_port);
        self
    }

    /// Whether the remote endpoint is known
    pub fn has_remote(&self) -> bool {
        self.remote_ip.is_some() && self.remote_port.is_some()
    }

    /// Remote endpoint as a socket address, if known and parseable
    pub fn remote_addr(&self) -> Option<SocketAddr> {
        let ip: IpAddr = self.remote_ip.as_deref()?.parse().ok()?;
        Some(SocketAddr::new(ip, self.remote_port?))
    }
}

/// SCTP association parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SctpParameters {
    pub port: u16,
    /// Outbound streams
    #[serde(rename = "OS")]
    pub os: u16,
    /// Max inbound streams
    #[serde(rename = "MIS")]
    pub mis: u16,
    pub max_message_size: u32,
}

/// SCTP association state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SctpState {
    New,
    Connecting,
    Connected,
    Failed,
    Closed,
}

impl SctpState {
    pub fn is_closed(self) -> bool {
        self == SctpState::Closed
    }
}

impl fmt::Display for SctpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SctpState::New => "new",
            SctpState::Connecting => "connecting",
            SctpState::Connected => "connected",
            SctpState::Failed => "failed",
            SctpState::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Kind of trace record the worker can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceEventType {
    Probe,
    Bwe,
}

/// Direction of the traced traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceDirection {
    In,
    Out,
}

/// Trace record pushed by the worker; `info` is implementation-defined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEventData {
    #[serde(rename = "type")]
    pub event_type: TraceEventType,
    pub timestamp: u64,
    pub direction: TraceDirection,
    #[serde(default)]
    pub info: Value,
}

/// Remote endpoint supplied to `connect`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectParams {
    pub ip: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtcp_port: Option<u16>,
}

impl ConnectParams {
    pub fn new(ip: impl Into<String>, port: u16) -> Self {
        Self {
            ip: ip.into(),
            port,
            rtcp_port: None,
        }
    }

    pub fn with_rtcp_port(mut self, rtcp_port: u16) -> Self {
        self.rtcp_port = Some(rtcp_port);
        self
    }
}

/// Worker reply to `transport.connect`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectResponse {
    pub tuple: TransportTuple,
    #[serde(default)]
    pub rtcp_tuple: Option<TransportTuple>,
}

/// Request target identifying a transport inside the worker
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportInternal {
    pub router_id: String,
    pub transport_id: String,
}

impl TransportInternal {
    pub fn new(router_id: impl Into<String>, transport_id: impl Into<String>) -> Self {
        Self {
            router_id: router_id.into(),
            transport_id: transport_id.into(),
        }
    }
}

/// Initial snapshot handed over by the worker when the transport is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlainTransportData {
    #[serde(default)]
    pub rtcp_mux: bool,
    #[serde(default)]
    pub comedia: bool,
    #[serde(default)]
    pub multi_source: bool,
    pub tuple: TransportTuple,
    #[serde(default)]
    pub rtcp_tuple: Option<TransportTuple>,
    #[serde(default)]
    pub sctp_parameters: Option<SctpParameters>,
    #[serde(default)]
    pub sctp_state: Option<SctpState>,
}

impl PlainTransportData {
    /// Snapshot with RTCP muxed, no SCTP and no special reception mode
    pub fn new(tuple: TransportTuple) -> Self {
        Self {
            rtcp_mux: true,
            comedia: false,
            multi_source: false,
            tuple,
            rtcp_tuple: None,
            sctp_parameters: None,
            sctp_state: None,
        }
    }
}

/// Parameters for creating a consumer on a transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumeParams {
    pub producer_id: String,
    pub rtp_capabilities: Value,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub app_data: Value,
}

impl ConsumeParams {
    pub fn new(producer_id: impl Into<String>, rtp_capabilities: Value) -> Self {
        Self {
            producer_id: producer_id.into(),
            rtp_capabilities,
            paused: false,
            app_data: Value::Null,
        }
    }
}

/// Consumer created by the worker; `data` is the worker reply as received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerInfo {
    pub id: String,
    pub producer_id: String,
    pub data: Value,
}
