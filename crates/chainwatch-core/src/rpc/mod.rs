//! RPC endpoint resilience: health tracking, ordering and failover.

pub mod failover;
pub mod health;
pub mod prioritizer;
pub mod transport;

pub use failover::{FailoverConfig, FailoverRunner, PassOutcome};
pub use health::{EndpointHealthReport, HealthStatus, LatencyState, RpcHealthRecord, RpcHealthRegistry};
pub use prioritizer::prioritize;
pub use transport::{is_address, ChainClient, ChainSnapshot, EvmJsonRpcClient};
