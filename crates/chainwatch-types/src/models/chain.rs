//! Static chain and token configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// One monitored network. Immutable after load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct ChainConfig {
    /// Display name, also the key into account balance maps
    #[validate(length(min = 1_u64))]
    pub name: String,
    /// Price-feed id of the native asset (CoinGecko id)
    #[serde(alias = "coingecko_id")]
    pub price_feed_id: String,
    /// Candidate RPC endpoints; list order is the tie-break order
    #[serde(default)]
    pub rpc_urls: Vec<String>,
    /// Decimals of the native asset
    #[validate(range(max = 28_u32))]
    #[serde(default = "default_decimals")]
    pub decimals: u32,
    /// How many recent blocks to scan for account transactions
    #[validate(range(max = 256_u64))]
    #[serde(default = "default_tx_scan_blocks")]
    pub tx_scan_blocks: u64,
    /// Tracked tokens, in display order
    #[serde(default)]
    #[validate(nested)]
    pub tokens: Vec<TokenConfig>,
}

/// A token tracked on a chain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct TokenConfig {
    #[validate(length(min = 1_u64))]
    pub symbol: String,
    /// Price-feed id, independent of the chain's own id
    #[serde(alias = "coingecko_id")]
    pub price_feed_id: String,
    /// Contract address used for balance lookups
    #[serde(default)]
    pub contract: String,
    #[validate(range(max = 28_u32))]
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

fn default_decimals() -> u32 {
    18
}

fn default_tx_scan_blocks() -> u64 {
    5
}

impl ChainConfig {
    pub fn new(name: impl Into<String>, price_feed_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price_feed_id: price_feed_id.into(),
            rpc_urls: Vec::new(),
            decimals: default_decimals(),
            tx_scan_blocks: default_tx_scan_blocks(),
            tokens: Vec::new(),
        }
    }

    pub fn with_rpc_urls(mut self, urls: Vec<String>) -> Self {
        self.rpc_urls = urls;
        self
    }

    pub fn with_token(mut self, token: TokenConfig) -> Self {
        self.tokens.push(token);
        self
    }

    /// Look up a configured token by symbol.
    pub fn token(&self, symbol: &str) -> Option<&TokenConfig> {
        self.tokens.iter().find(|t| t.symbol == symbol)
    }
}

impl TokenConfig {
    pub fn new(symbol: impl Into<String>, price_feed_id: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            price_feed_id: price_feed_id.into(),
            contract: String::new(),
            decimals: default_decimals(),
        }
    }

    pub fn with_contract(mut self, contract: impl Into<String>, decimals: u32) -> Self {
        self.contract = contract.into();
        self.decimals = decimals;
        self
    }
}
