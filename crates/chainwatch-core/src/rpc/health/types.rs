//! Health tracking types.

use serde::Serialize;
use std::time::{Duration, Instant};

/// Latency measurement of one endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LatencyState {
    /// Never measured
    #[default]
    Unknown,
    /// Last attempt succeeded in the given time
    Healthy(Duration),
    /// Last attempt failed
    Errored,
}

impl LatencyState {
    pub fn as_healthy(&self) -> Option<Duration> {
        match self {
            Self::Healthy(d) => Some(*d),
            Self::Unknown | Self::Errored => None,
        }
    }
}

/// Summary status used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Reachable with a measured latency
    Healthy,
    /// Not attempted yet
    Unknown,
    /// Last attempt failed, cooldown already elapsed
    Errored,
    /// Inside its failure window
    CoolingDown,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Unknown => write!(f, "unknown"),
            HealthStatus::Errored => write!(f, "errored"),
            HealthStatus::CoolingDown => write!(f, "cooling_down"),
        }
    }
}

/// Health state for a single endpoint id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RpcHealthRecord {
    pub latency: LatencyState,
    /// Endpoint is in cooldown while this lies in the future
    pub cooldown_until: Option<Instant>,
    pub(crate) total_successes: u32,
    pub(crate) total_failures: u32,
    pub(crate) last_error: Option<String>,
}

impl RpcHealthRecord {
    /// In cooldown iff a deadline exists and is after `now`, whatever the latency state.
    pub fn is_in_cooldown(&self, now: Instant) -> bool {
        self.cooldown_until.is_some_and(|until| until > now)
    }

    pub fn status(&self, now: Instant) -> HealthStatus {
        if self.is_in_cooldown(now) {
            return HealthStatus::CoolingDown;
        }
        match self.latency {
            LatencyState::Healthy(_) => HealthStatus::Healthy,
            LatencyState::Unknown => HealthStatus::Unknown,
            LatencyState::Errored => HealthStatus::Errored,
        }
    }

    pub fn total_successes(&self) -> u32 {
        self.total_successes
    }

    pub fn total_failures(&self) -> u32 {
        self.total_failures
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

/// Response structure for endpoint diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct EndpointHealthReport {
    pub endpoint: String,
    pub status: HealthStatus,
    pub latency_ms: Option<u64>,
    pub cooldown_remaining_ms: Option<u64>,
    pub total_successes: u32,
    pub total_failures: u32,
    pub last_error: Option<String>,
    pub success_rate: f64,
}
