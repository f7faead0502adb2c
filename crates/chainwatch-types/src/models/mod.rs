//! Core domain models for Chainwatch.
//!
//! This module contains all shared data structures used across the monitor.

mod account;
mod chain;
mod config;
mod transaction;

// Re-export all models
pub use account::AccountState;
pub use chain::{ChainConfig, TokenConfig};
pub use config::MonitorConfig;
pub use transaction::{TxDirection, TxFilter, TxInfo};
