use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Feed id → USD price, as fetched in one refresh cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    prices: HashMap<String, f64>,
    fetched_at: Option<DateTime<Utc>>,
}

impl PriceTable {
    /// Build a table from oracle output. Non-finite prices are dropped.
    pub fn new(prices: HashMap<String, f64>) -> Self {
        let prices = prices.into_iter().filter(|(_, p)| p.is_finite()).collect();
        Self { prices, fetched_at: Some(Utc::now()) }
    }

    pub fn get(&self, feed_id: &str) -> Option<f64> {
        self.prices.get(feed_id).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// When the underlying prices were fetched; `None` for the initial empty table.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }
}

impl FromIterator<(String, f64)> for PriceTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Holder of the currently published [`PriceTable`].
#[derive(Debug, Default)]
pub struct PriceBook {
    current: RwLock<Arc<PriceTable>>,
}

impl PriceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table published most recently. Stays valid after later publishes.
    pub fn snapshot(&self) -> Arc<PriceTable> {
        Arc::clone(&self.current.read())
    }

    /// Replace the published table.
    pub fn publish(&self, table: PriceTable) {
        let count = table.len();
        *self.current.write() = Arc::new(table);
        tracing::debug!(prices = count, "Price table published");
    }
}
