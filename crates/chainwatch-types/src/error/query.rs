//! Errors surfaced by a failover query pass.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of a pass that produced no data.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum QueryError {
    /// Every candidate endpoint failed within one pass
    #[error("All endpoints exhausted after {attempts} attempts")]
    AllEndpointsExhausted { attempts: usize },

    /// The candidate list was empty
    #[error("No candidate endpoints configured")]
    NoCandidates,

    /// The pass was cancelled before any candidate succeeded
    #[error("Query pass cancelled")]
    Cancelled,

    /// The request was rejected locally before reaching any endpoint
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}
