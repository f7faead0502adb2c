//! # Chainwatch Core
//!
//! Resilience and aggregation layer of the Chainwatch multi-chain monitor.
//!
//! ## Architecture
//!
//! ```text
//! chainwatch-core/src/
//! ├── rpc/
//! │   ├── health/       # Per-endpoint latency/cooldown registry
//! │   ├── prioritizer   # Four-tier endpoint ordering
//! │   ├── failover      # Sequential attempt loop over the ordering
//! │   └── transport/    # ChainClient trait + EVM JSON-RPC client
//! ├── pricing/          # PriceTable snapshots, oracle trait + CoinGecko client
//! ├── portfolio/        # Quote-currency totals and transaction filtering
//! ├── poller/           # Account and price refresh loops
//! ├── session.rs        # Session state shared with the presentation layer
//! ├── display.rs        # Formatting and privacy masking helpers
//! └── modules/config    # Config file I/O
//! ```

#![cfg_attr(test, allow(clippy::float_cmp, clippy::unwrap_used))]

pub mod display;
pub mod error;
pub mod modules;
pub mod poller;
pub mod portfolio;
pub mod pricing;
pub mod rpc;
pub mod session;
pub mod telemetry;

// Re-export commonly used types
pub use error::{AppError, AppResult};
pub use portfolio::{calculate_account_total, filter_transactions};
pub use pricing::{PriceBook, PriceTable};
pub use rpc::{prioritize, FailoverRunner, LatencyState, RpcHealthRegistry};
pub use session::MonitorSession;
