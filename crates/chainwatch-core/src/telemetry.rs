//! Metrics for endpoint health and price refresh observability.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! binary installs a recorder.
//! - `chainwatch_rpc_attempts_total{endpoint,outcome}` - Counter of endpoint attempts
//! - `chainwatch_rpc_latency_seconds{endpoint}` - Histogram of successful attempt latency
//! - `chainwatch_passes_exhausted_total{chain}` - Counter of passes where every endpoint failed
//! - `chainwatch_price_refresh_total{outcome}` - Counter of price table refreshes
//! - `chainwatch_accounts_monitored` - Gauge of accounts in the session

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::sync::Once;
use std::time::Duration;

static DESCRIBE: Once = Once::new();

/// Register all metric descriptions. Safe to call more than once.
pub fn describe_metrics() {
    DESCRIBE.call_once(|| {
        describe_counter!(
            "chainwatch_rpc_attempts_total",
            "RPC endpoint attempts by endpoint and outcome"
        );
        describe_histogram!(
            "chainwatch_rpc_latency_seconds",
            "Observed latency of successful RPC attempts"
        );
        describe_counter!(
            "chainwatch_passes_exhausted_total",
            "Query passes in which every candidate endpoint failed"
        );
        describe_counter!("chainwatch_price_refresh_total", "Price table refreshes by outcome");
        describe_gauge!("chainwatch_accounts_monitored", "Accounts currently monitored");
    });
}

/// Record one endpoint attempt.
///
/// Labels: outcome = "success" | "timeout" | "transport" | "malformed" | "rpc"
pub(crate) fn record_attempt(endpoint: &str, outcome: &str, latency: Option<Duration>) {
    let labels = [("endpoint", endpoint.to_string()), ("outcome", outcome.to_string())];
    counter!("chainwatch_rpc_attempts_total", &labels).increment(1);

    if let Some(latency) = latency {
        let labels = [("endpoint", endpoint.to_string())];
        histogram!("chainwatch_rpc_latency_seconds", &labels).record(latency.as_secs_f64());
    }
}

pub(crate) fn record_exhausted(chain: &str) {
    let labels = [("chain", chain.to_string())];
    counter!("chainwatch_passes_exhausted_total", &labels).increment(1);
}

/// Labels: outcome = "success" | "error"
pub(crate) fn record_price_refresh(outcome: &str) {
    let labels = [("outcome", outcome.to_string())];
    counter!("chainwatch_price_refresh_total", &labels).increment(1);
}

pub(crate) fn update_account_gauge(count: usize) {
    gauge!("chainwatch_accounts_monitored").set(count as f64);
}
