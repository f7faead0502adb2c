//! Typed error definitions for Chainwatch.
//!
//! This module provides a structured error hierarchy with specific error types
//! for different domains. All errors are designed to be:
//!
//! - **Serializable** for diagnostics output via serde
//! - **Displayable** for logging via Display trait
//! - **Matchable** for error handling logic via enum variants

mod config;
mod endpoint;
mod query;

pub use config::ConfigError;
pub use endpoint::EndpointFailure;
pub use query::QueryError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type that wraps all domain-specific errors.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "domain", content = "error")]
pub enum TypedError {
    /// Wraps a failed query pass
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Wraps a single endpoint failure
    #[error("Endpoint error: {0}")]
    Endpoint(#[from] EndpointFailure),

    /// Wraps a configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Standard Result type using TypedError.
pub type Result<T> = std::result::Result<T, TypedError>;
