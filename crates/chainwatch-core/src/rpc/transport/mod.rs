//! Node transport capability.
//!
//! The core never speaks a wire protocol itself: a [`ChainClient`] is handed
//! an endpoint id and returns data or an [`EndpointFailure`]. The failover
//! runner decides which endpoint to hand it.

mod evm;
mod hex;

pub use evm::EvmJsonRpcClient;
pub use hex::is_address;

use async_trait::async_trait;
use chainwatch_types::{ChainConfig, EndpointFailure, TokenConfig, TxInfo};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Everything one pass fetches for an (account, chain) pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainSnapshot {
    pub native_balance: Decimal,
    /// Token symbol → balance
    pub token_balances: HashMap<String, Decimal>,
    pub transactions: Vec<TxInfo>,
}

/// Read-only access to a chain node.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Native balance of `address`, scaled by the chain's decimals.
    async fn native_balance(
        &self,
        endpoint: &str,
        chain: &ChainConfig,
        address: &str,
    ) -> Result<Decimal, EndpointFailure>;

    /// Token balance of `address`, scaled by the token's decimals.
    async fn token_balance(
        &self,
        endpoint: &str,
        token: &TokenConfig,
        address: &str,
    ) -> Result<Decimal, EndpointFailure>;

    /// Recent transactions sent or received by `address`.
    async fn recent_transactions(
        &self,
        endpoint: &str,
        chain: &ChainConfig,
        address: &str,
    ) -> Result<Vec<TxInfo>, EndpointFailure>;

    /// Fetch native balance, every configured token and recent transactions
    /// from a single endpoint. Any failure fails the whole snapshot.
    async fn fetch_snapshot(
        &self,
        endpoint: &str,
        chain: &ChainConfig,
        address: &str,
    ) -> Result<ChainSnapshot, EndpointFailure> {
        let native_balance = self.native_balance(endpoint, chain, address).await?;

        let mut token_balances = HashMap::with_capacity(chain.tokens.len());
        for token in &chain.tokens {
            let balance = self.token_balance(endpoint, token, address).await?;
            token_balances.insert(token.symbol.clone(), balance);
        }

        let transactions = self.recent_transactions(endpoint, chain, address).await?;

        Ok(ChainSnapshot { native_balance, token_balances, transactions })
    }
}
