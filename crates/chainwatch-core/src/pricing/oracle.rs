//! Price oracle capability and the CoinGecko client.

use async_trait::async_trait;
use chainwatch_types::ChainConfig;
use reqwest::Client;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Source of USD prices.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Fetch prices for `feed_ids`. Unresolved ids are absent from the result.
    async fn fetch_prices(&self, feed_ids: &[String]) -> AppResult<HashMap<String, f64>>;
}

/// Every distinct, non-empty feed id referenced by chains and their tokens, sorted.
pub fn feed_ids(chains: &[ChainConfig]) -> Vec<String> {
    let mut ids = BTreeSet::new();
    for chain in chains {
        ids.insert(chain.price_feed_id.as_str());
        for token in &chain.tokens {
            ids.insert(token.price_feed_id.as_str());
        }
    }
    ids.into_iter().filter(|id| !id.is_empty()).map(str::to_string).collect()
}

/// CoinGecko `simple/price` client.
pub struct CoinGeckoOracle {
    http: Client,
    base_url: String,
}

impl CoinGeckoOracle {
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }
}

#[async_trait]
impl PriceOracle for CoinGeckoOracle {
    async fn fetch_prices(&self, feed_ids: &[String]) -> AppResult<HashMap<String, f64>> {
        if feed_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let resp = self
            .http
            .get(format!("{}/simple/price", self.base_url))
            .query(&[("ids", feed_ids.join(",")), ("vs_currencies", "usd".to_string())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(AppError::PriceOracle(format!("HTTP {}: {}", status, message)));
        }

        let body: HashMap<String, HashMap<String, f64>> = resp.json().await?;
        let prices: HashMap<String, f64> = body
            .into_iter()
            .filter_map(|(id, quotes)| quotes.get("usd").copied().map(|usd| (id, usd)))
            .collect();

        tracing::debug!(requested = feed_ids.len(), resolved = prices.len(), "Fetched prices");
        Ok(prices)
    }
}
