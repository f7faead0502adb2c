//! Per-account polling state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::transaction::TxInfo;

/// Last-known-good view of one monitored address.
///
/// Owned by the polling layer and only mutated by a successful query pass;
/// chains whose pass failed keep their previous values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AccountState {
    pub address: String,
    /// Chain name → native balance
    #[serde(default)]
    pub balances: HashMap<String, Decimal>,
    /// Chain name → token symbol → balance
    #[serde(default)]
    pub token_balances: HashMap<String, HashMap<String, Decimal>>,
    /// Transactions grouped in chain configuration order
    #[serde(default)]
    pub transactions: Vec<TxInfo>,
    /// Time of the last pass that changed anything
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl AccountState {
    pub fn new(address: impl Into<String>) -> Self {
        Self { address: address.into(), ..Default::default() }
    }

    /// Native balance for a chain, if one has been fetched.
    pub fn balance(&self, chain: &str) -> Option<&Decimal> {
        self.balances.get(chain)
    }

    /// Token balance for a chain/symbol pair, if one has been fetched.
    pub fn token_balance(&self, chain: &str, symbol: &str) -> Option<&Decimal> {
        self.token_balances.get(chain).and_then(|tokens| tokens.get(symbol))
    }

    /// Whether no data has been fetched yet.
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty() && self.token_balances.is_empty() && self.transactions.is_empty()
    }
}
