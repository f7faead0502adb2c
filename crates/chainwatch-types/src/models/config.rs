//! Monitor configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

use super::chain::ChainConfig;
use super::transaction::TxFilter;

/// Default public price API base.
pub const DEFAULT_PRICE_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Full monitor configuration, loaded once per session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct MonitorConfig {
    /// Monitored chains, in display order
    #[serde(default)]
    #[validate(nested)]
    pub chains: Vec<ChainConfig>,
    /// Addresses to monitor
    #[serde(default)]
    pub accounts: Vec<String>,
    /// Seconds between account poll cycles
    #[validate(range(min = 5_u64, max = 3600_u64))]
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Seconds between price table refreshes
    #[validate(range(min = 10_u64, max = 3600_u64))]
    #[serde(default = "default_price_refresh")]
    pub price_refresh_secs: u64,
    /// Per-attempt RPC timeout in milliseconds
    #[validate(range(min = 100_u64, max = 60000_u64))]
    #[serde(default = "default_rpc_timeout")]
    pub rpc_timeout_ms: u64,
    /// Cooldown applied to an endpoint after a failed attempt
    #[validate(range(min = 1_u64, max = 86400_u64))]
    #[serde(default = "default_rpc_cooldown")]
    pub rpc_cooldown_secs: u64,
    /// Price oracle base URL
    #[validate(url)]
    #[serde(default = "default_price_api_url")]
    pub price_api_url: String,
    /// Hide balances and addresses in output
    #[serde(default)]
    pub privacy_mode: bool,
    /// Initial transaction filter
    #[serde(default)]
    pub tx_filter: TxFilter,
}

fn default_poll_interval() -> u64 {
    30
}

fn default_price_refresh() -> u64 {
    60
}

fn default_rpc_timeout() -> u64 {
    5000
}

fn default_rpc_cooldown() -> u64 {
    60
}

fn default_price_api_url() -> String {
    DEFAULT_PRICE_API_URL.to_string()
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            chains: Vec::new(),
            accounts: Vec::new(),
            poll_interval_secs: default_poll_interval(),
            price_refresh_secs: default_price_refresh(),
            rpc_timeout_ms: default_rpc_timeout(),
            rpc_cooldown_secs: default_rpc_cooldown(),
            price_api_url: default_price_api_url(),
            privacy_mode: false,
            tx_filter: TxFilter::default(),
        }
    }
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn price_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.price_refresh_secs)
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }

    pub fn rpc_cooldown(&self) -> Duration {
        Duration::from_secs(self.rpc_cooldown_secs)
    }

    /// Look up a chain by name.
    pub fn chain(&self, name: &str) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let cfg: MonitorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, MonitorConfig::default());
        assert_eq!(cfg.rpc_timeout(), Duration::from_millis(5000));
        assert_eq!(cfg.tx_filter, TxFilter::All);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_interval_rejected() {
        let cfg = MonitorConfig { poll_interval_secs: 1, ..Default::default() };
        let errors = cfg.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("poll_interval_secs"));
    }
}
