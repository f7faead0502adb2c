//! Shared endpoint health registry.
#![allow(clippy::arithmetic_side_effects, reason = "saturating counter operations")]

use dashmap::DashMap;
use std::time::{Duration, Instant};

use super::response::build_health_report;
use super::types::{EndpointHealthReport, LatencyState, RpcHealthRecord};

/// Maximum stored length of a failure reason.
const MAX_ERROR_LEN: usize = 300;

/// Cooldown horizon used when `now + cooldown` is not representable.
const FAR_FUTURE: Duration = Duration::from_secs(30 * 365 * 24 * 60 * 60);

/// Per-endpoint latency and cooldown state, shared by every chain's passes.
///
/// Records are keyed by endpoint id, never by chain: two chains listing the
/// same URL share one record. Every operation touches exactly one key and
/// holds that key's entry lock for its whole read-modify-write.
#[derive(Debug, Default)]
pub struct RpcHealthRegistry {
    records: DashMap<String, RpcHealthRecord>,
}

impl RpcHealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an attempt as successful: `Healthy(latency)` and no cooldown.
    pub fn record_success(&self, endpoint: &str, latency: Duration) {
        let mut record = self.records.entry(endpoint.to_string()).or_default();
        record.latency = LatencyState::Healthy(latency);
        record.cooldown_until = None;
        record.total_successes = record.total_successes.saturating_add(1);

        tracing::debug!(
            endpoint = %endpoint,
            latency_ms = latency.as_millis() as u64,
            "RPC endpoint healthy"
        );
    }

    /// Mark an attempt as failed, starting a cooldown of `cooldown` from now.
    pub fn record_failure(&self, endpoint: &str, cooldown: Duration) {
        self.record_failure_at(endpoint, cooldown, Instant::now(), None);
    }

    /// Mark an attempt as failed, keeping the reason for diagnostics.
    pub fn record_failure_with_reason(&self, endpoint: &str, cooldown: Duration, reason: &str) {
        self.record_failure_at(endpoint, cooldown, Instant::now(), Some(reason));
    }

    /// Mark an attempt as failed with an explicit reference instant.
    pub fn record_failure_at(
        &self,
        endpoint: &str,
        cooldown: Duration,
        now: Instant,
        reason: Option<&str>,
    ) {
        let mut record = self.records.entry(endpoint.to_string()).or_default();
        record.latency = LatencyState::Errored;
        let until = now
            .checked_add(cooldown)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        record.cooldown_until = Some(until);
        record.total_failures = record.total_failures.saturating_add(1);
        if let Some(reason) = reason {
            record.last_error = Some(truncate_reason(reason));
        }

        tracing::debug!(
            endpoint = %endpoint,
            cooldown_secs = cooldown.as_secs(),
            failures = record.total_failures,
            "RPC endpoint entered cooldown"
        );
    }

    /// True iff a cooldown deadline exists for `endpoint` and lies after `now`.
    pub fn is_in_cooldown(&self, endpoint: &str, now: Instant) -> bool {
        self.records.get(endpoint).is_some_and(|r| r.is_in_cooldown(now))
    }

    /// Latency state, `Unknown` for endpoints never attempted.
    pub fn latency(&self, endpoint: &str) -> LatencyState {
        self.records.get(endpoint).map(|r| r.latency).unwrap_or_default()
    }

    /// Latency and cooldown flag read under a single entry lock.
    pub fn status(&self, endpoint: &str, now: Instant) -> (LatencyState, bool) {
        self.records
            .get(endpoint)
            .map(|r| (r.latency, r.is_in_cooldown(now)))
            .unwrap_or((LatencyState::Unknown, false))
    }

    /// Copy of the record for `endpoint`, if it has ever been attempted.
    pub fn get(&self, endpoint: &str) -> Option<RpcHealthRecord> {
        self.records.get(endpoint).map(|r| r.clone())
    }

    /// Diagnostics for every known endpoint, sorted by id.
    pub fn snapshot(&self, now: Instant) -> Vec<EndpointHealthReport> {
        let mut reports: Vec<EndpointHealthReport> = self
            .records
            .iter()
            .map(|entry| build_health_report(entry.key(), entry.value(), now))
            .collect();
        reports.sort_by(|a, b| a.endpoint.cmp(&b.endpoint));
        reports
    }

    /// Number of endpoints currently in cooldown.
    pub fn cooling_down_count(&self, now: Instant) -> usize {
        self.records.iter().filter(|e| e.value().is_in_cooldown(now)).count()
    }

    #[cfg(test)]
    pub(crate) fn insert_record(&self, endpoint: &str, record: RpcHealthRecord) {
        self.records.insert(endpoint.to_string(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn truncate_reason(s: &str) -> String {
    if s.chars().count() <= MAX_ERROR_LEN {
        s.to_string()
    } else {
        let mut result: String = s.chars().take(MAX_ERROR_LEN).collect();
        result.push('…');
        result
    }
}
