//! Unified error types for Chainwatch Core.

use chainwatch_types::{ConfigError, QueryError};
use serde::Serialize;
use thiserror::Error;

/// Main error type for all Chainwatch operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// Network request failed (HTTP client).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A failover pass produced no data.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Configuration loading or validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Price oracle returned an unusable response.
    #[error("Price oracle error: {0}")]
    PriceOracle(String),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

/// Result type alias for Chainwatch operations.
pub type AppResult<T> = Result<T, AppError>;
