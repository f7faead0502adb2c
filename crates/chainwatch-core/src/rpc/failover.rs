//! Sequential failover over prioritized endpoints.
//!
//! One pass asks the prioritizer for an order and tries each endpoint in turn,
//! never two at once and never the same endpoint twice. The first success is
//! returned immediately; every failure (timeout, transport, malformed data)
//! puts the endpoint in cooldown and moves on. The cooldown is the only
//! backoff: there is no retry inside a pass.
//!
//! A request rejected locally (`EndpointFailure::InvalidRequest`) would fail
//! the same way everywhere. It ends the pass with `QueryError::InvalidRequest`
//! and no endpoint is penalized for it.

use chainwatch_types::{EndpointFailure, MonitorConfig, QueryError};
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use super::health::RpcHealthRegistry;
use super::prioritizer::prioritize;
use crate::telemetry;

/// Timeouts and penalties applied by a [`FailoverRunner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailoverConfig {
    /// Default per-attempt timeout
    pub attempt_timeout: Duration,
    /// Cooldown recorded for an endpoint after a failed attempt
    pub cooldown: Duration,
}

impl Default for FailoverConfig {
    fn default() -> Self {
        Self { attempt_timeout: Duration::from_secs(5), cooldown: Duration::from_secs(60) }
    }
}

impl From<&MonitorConfig> for FailoverConfig {
    fn from(config: &MonitorConfig) -> Self {
        Self { attempt_timeout: config.rpc_timeout(), cooldown: config.rpc_cooldown() }
    }
}

/// Successful pass result.
#[derive(Debug, Clone, PartialEq)]
pub struct PassOutcome<T> {
    pub value: T,
    /// Endpoint that produced `value`
    pub endpoint: String,
    pub latency: Duration,
    /// Attempts made in this pass, including the successful one
    pub attempts: usize,
}

/// Runs query passes against the shared health registry.
#[derive(Debug, Clone)]
pub struct FailoverRunner {
    registry: Arc<RpcHealthRegistry>,
    config: FailoverConfig,
}

impl FailoverRunner {
    pub fn new(registry: Arc<RpcHealthRegistry>, config: FailoverConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Arc<RpcHealthRegistry> {
        &self.registry
    }

    pub fn config(&self) -> FailoverConfig {
        self.config
    }

    /// Run a pass with the configured timeout and no external cancellation.
    pub async fn attempt_query<S, T, F, Fut>(
        &self,
        candidates: &[S],
        op: F,
    ) -> Result<PassOutcome<T>, QueryError>
    where
        S: AsRef<str>,
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T, EndpointFailure>>,
    {
        let never = CancellationToken::new();
        self.attempt_query_with(candidates, self.config.attempt_timeout, &never, op).await
    }

    /// Run one pass over `candidates`.
    ///
    /// `op` performs the request against the endpoint it is given. Each call is
    /// bounded by `timeout`. Cancelling `cancel` stops the pass at once: the
    /// in-flight attempt and the untried candidates leave the registry alone.
    pub async fn attempt_query_with<S, T, F, Fut>(
        &self,
        candidates: &[S],
        timeout: Duration,
        cancel: &CancellationToken,
        mut op: F,
    ) -> Result<PassOutcome<T>, QueryError>
    where
        S: AsRef<str>,
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T, EndpointFailure>>,
    {
        if candidates.is_empty() {
            return Err(QueryError::NoCandidates);
        }

        let order = prioritize(candidates, &self.registry, Instant::now());
        let mut tried: HashSet<String> = HashSet::with_capacity(order.len());
        let mut attempts = 0_usize;

        for endpoint in order {
            if !tried.insert(endpoint.clone()) {
                continue;
            }
            if cancel.is_cancelled() {
                return Err(QueryError::Cancelled);
            }

            let started = Instant::now();
            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::debug!(endpoint = %endpoint, "Query pass cancelled mid-attempt");
                    return Err(QueryError::Cancelled);
                }
                r = tokio::time::timeout(timeout, op(endpoint.clone())) => r,
            };
            attempts = attempts.saturating_add(1);

            let failure = match result {
                Ok(Ok(value)) => {
                    let latency = started.elapsed();
                    self.registry.record_success(&endpoint, latency);
                    telemetry::record_attempt(&endpoint, "success", Some(latency));
                    return Ok(PassOutcome { value, endpoint, latency, attempts });
                },
                Ok(Err(failure)) => failure,
                Err(_) => EndpointFailure::Timeout {
                    endpoint: endpoint.clone(),
                    timeout_ms: timeout.as_millis() as u64,
                },
            };

            if !failure.is_endpoint_fault() {
                tracing::warn!(endpoint = %endpoint, "Request rejected before sending: {}", failure);
                return Err(QueryError::InvalidRequest { message: failure.to_string() });
            }

            self.registry.record_failure_with_reason(
                &endpoint,
                self.config.cooldown,
                &failure.to_string(),
            );
            telemetry::record_attempt(&endpoint, failure.kind(), None);
            tracing::warn!(
                endpoint = %endpoint,
                kind = failure.kind(),
                cooldown_secs = self.config.cooldown.as_secs(),
                "RPC attempt failed: {}",
                failure
            );
        }

        Err(QueryError::AllEndpointsExhausted { attempts })
    }
}
