//! RPC Endpoint Health Module
//!
//! Tracks per-endpoint latency and failure cooldowns:
//! - Latency as an explicit `Healthy(d) | Unknown | Errored` variant
//! - Cooldown deadline set on failure, cleared on success
//! - Cooldown evaluated lazily at read time (nothing expires records)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  RpcHealthRegistry                                           │
//! │  └── records: DashMap<endpoint id, RpcHealthRecord>         │
//! │      (per-key exclusive access; shared across chains)       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod registry;
mod response;
mod types;


pub use registry::RpcHealthRegistry;
pub use types::{EndpointHealthReport, HealthStatus, LatencyState, RpcHealthRecord};
