//! Per-endpoint failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single endpoint attempt that did not produce usable data.
///
/// Endpoint faults (timeout, transport, malformed, rpc) carry the same
/// penalty: the failover runner records them into the health registry and
/// moves on. `InvalidRequest` is raised before anything is sent; it ends the
/// pass and leaves the registry untouched.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum EndpointFailure {
    /// Attempt exceeded the caller-supplied timeout
    #[error("Endpoint {endpoint} timed out after {timeout_ms}ms")]
    Timeout { endpoint: String, timeout_ms: u64 },

    /// Connection, TLS or HTTP-level failure
    #[error("Transport error from {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    /// Response arrived but could not be decoded
    #[error("Malformed response from {endpoint}: {message}")]
    Malformed { endpoint: String, message: String },

    /// Node answered with a JSON-RPC error object
    #[error("RPC error {code} from {endpoint}: {message}")]
    Rpc { endpoint: String, code: i64, message: String },

    /// Request could not be built from local input (bad account or contract)
    #[error("Invalid request for {endpoint}: {message}")]
    InvalidRequest { endpoint: String, message: String },
}

impl EndpointFailure {
    /// Endpoint that produced the failure.
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Timeout { endpoint, .. }
            | Self::Transport { endpoint, .. }
            | Self::Malformed { endpoint, .. }
            | Self::Rpc { endpoint, .. }
            | Self::InvalidRequest { endpoint, .. } => endpoint,
        }
    }

    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Transport { .. } => "transport",
            Self::Malformed { .. } => "malformed",
            Self::Rpc { .. } => "rpc",
            Self::InvalidRequest { .. } => "invalid_request",
        }
    }

    /// Whether the endpoint is to blame. Same input fails on every endpoint otherwise.
    pub fn is_endpoint_fault(&self) -> bool {
        !matches!(self, Self::InvalidRequest { .. })
    }
}
