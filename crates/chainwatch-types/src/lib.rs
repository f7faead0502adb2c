//! # Chainwatch Types
//!
//! Core types, models, and error definitions for Chainwatch.
//!
//! This crate provides the foundational type system for the monitor:
//!
//! - **`error`** - Typed error hierarchy for endpoint queries and configuration
//! - **`models`** - Domain models (chains, tokens, accounts, transactions, config)
//!
//! ## Architecture Role
//!
//! `chainwatch-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!          chainwatch-types (this crate)
//!                   │
//!                   ▼
//!           chainwatch-core
//!                   │
//!                   ▼
//!          chainwatch-server
//! ```
//!
//! All types are designed to be:
//! - **Serializable** via serde for config files and diagnostics
//! - **Clone** for cheap sharing across async boundaries
//! - **PartialEq** for testing and comparison

pub mod error;
pub mod models;

// Re-export error types for convenience
pub use error::{ConfigError, EndpointFailure, QueryError, Result, TypedError};

// Re-export core model types
pub use models::{
    AccountState, ChainConfig, MonitorConfig, TokenConfig, TxDirection, TxFilter, TxInfo,
};
