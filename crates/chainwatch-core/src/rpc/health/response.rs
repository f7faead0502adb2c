use std::time::Instant;

use super::types::{EndpointHealthReport, RpcHealthRecord};

pub fn build_health_report(
    endpoint: &str,
    record: &RpcHealthRecord,
    now: Instant,
) -> EndpointHealthReport {
    let latency_ms = record.latency.as_healthy().map(|d| d.as_millis() as u64);

    let cooldown_remaining_ms = record
        .cooldown_until
        .filter(|until| *until > now)
        .map(|until| until.duration_since(now).as_millis() as u64);

    let total = u64::from(record.total_successes) + u64::from(record.total_failures);
    let success_rate = if total > 0 {
        (f64::from(record.total_successes) / total as f64) * 100.0
    } else {
        100.0
    };

    EndpointHealthReport {
        endpoint: endpoint.to_string(),
        status: record.status(now),
        latency_ms,
        cooldown_remaining_ms,
        total_successes: record.total_successes,
        total_failures: record.total_failures,
        last_error: record.last_error.clone(),
        success_rate,
    }
}
