//! Endpoint ordering for the next failover pass.
//!
//! Candidates are ranked by a stable four-tier sort:
//!
//! 1. not in cooldown, `Healthy(d)`: ascending `d`
//! 2. not in cooldown, `Unknown`
//! 3. not in cooldown, `Errored`
//! 4. in cooldown, whatever the latency state
//!
//! Ties (and every tier except the first) keep the candidate list order.
//! Endpoints in cooldown are tried last rather than dropped.

use std::time::{Duration, Instant};

use super::health::{LatencyState, RpcHealthRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Tier {
    Healthy,
    Unknown,
    Errored,
    CoolingDown,
}

fn rank(latency: LatencyState, in_cooldown: bool) -> (Tier, Duration) {
    if in_cooldown {
        return (Tier::CoolingDown, Duration::ZERO);
    }
    match latency {
        LatencyState::Healthy(d) => (Tier::Healthy, d),
        LatencyState::Unknown => (Tier::Unknown, Duration::ZERO),
        LatencyState::Errored => (Tier::Errored, Duration::ZERO),
    }
}

/// Order `candidates` for the next attempt given the registry state at `now`.
///
/// The output is always a permutation of the input.
pub fn prioritize<S: AsRef<str>>(
    candidates: &[S],
    registry: &RpcHealthRegistry,
    now: Instant,
) -> Vec<String> {
    let mut ranked: Vec<(Tier, Duration, &str)> = candidates
        .iter()
        .map(|candidate| {
            let id = candidate.as_ref();
            let (latency, in_cooldown) = registry.status(id, now);
            let (tier, latency) = rank(latency, in_cooldown);
            (tier, latency, id)
        })
        .collect();

    // sort_by is stable: equal keys keep their input order
    ranked.sort_by(|(tier_a, lat_a, _), (tier_b, lat_b, _)| {
        tier_a.cmp(tier_b).then_with(|| lat_a.cmp(lat_b))
    });

    ranked.into_iter().map(|(_, _, id)| id.to_string()).collect()
}
