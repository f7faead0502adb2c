//! Ethereum-style JSON-RPC client.

use async_trait::async_trait;
use chainwatch_types::{ChainConfig, EndpointFailure, TokenConfig, TxInfo};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::hex::{encode_balance_of, encode_quantity, is_address, parse_quantity, to_decimal};
use super::ChainClient;
use crate::error::AppResult;

const USER_AGENT: &str = concat!("chainwatch/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcBlock {
    #[serde(default)]
    transactions: Vec<RpcTransaction>,
}

#[derive(Debug, Deserialize)]
struct RpcTransaction {
    hash: String,
    from: String,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    value: Option<String>,
}

/// [`ChainClient`] over plain HTTP JSON-RPC (`eth_*` methods).
///
/// The per-attempt deadline is enforced by the failover runner, so the
/// underlying `reqwest::Client` only bounds connection setup.
pub struct EvmJsonRpcClient {
    http: Client,
    next_id: AtomicU64,
}

impl EvmJsonRpcClient {
    pub fn new() -> AppResult<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::with_client(http))
    }

    pub fn with_client(http: Client) -> Self {
        Self { http, next_id: AtomicU64::new(1) }
    }

    async fn call(&self, endpoint: &str, method: &str, params: Value) -> Result<Value, EndpointFailure> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params });

        let resp = self.http.post(endpoint).json(&body).send().await.map_err(|e| {
            EndpointFailure::Transport { endpoint: endpoint.to_string(), message: e.to_string() }
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(EndpointFailure::Transport {
                endpoint: endpoint.to_string(),
                message: format!("HTTP {} for {}", status, method),
            });
        }

        let envelope: RpcEnvelope = resp.json().await.map_err(|e| EndpointFailure::Malformed {
            endpoint: endpoint.to_string(),
            message: format!("{}: {}", method, e),
        })?;

        if let Some(err) = envelope.error {
            return Err(EndpointFailure::Rpc {
                endpoint: endpoint.to_string(),
                code: err.code,
                message: err.message,
            });
        }

        envelope.result.filter(|v| !v.is_null()).ok_or_else(|| EndpointFailure::Malformed {
            endpoint: endpoint.to_string(),
            message: format!("{}: missing result", method),
        })
    }

    async fn call_quantity(
        &self,
        endpoint: &str,
        method: &str,
        params: Value,
    ) -> Result<u128, EndpointFailure> {
        let result = self.call(endpoint, method, params).await?;
        result
            .as_str()
            .ok_or_else(|| format!("{}: result is not a string", method))
            .and_then(parse_quantity)
            .map_err(|message| malformed(endpoint, message))
    }
}

fn malformed(endpoint: &str, message: String) -> EndpointFailure {
    EndpointFailure::Malformed { endpoint: endpoint.to_string(), message }
}

fn invalid_request(endpoint: &str, message: String) -> EndpointFailure {
    EndpointFailure::InvalidRequest { endpoint: endpoint.to_string(), message }
}

/// Reject an account the node could never answer for, before any request is sent.
fn check_account(endpoint: &str, address: &str) -> Result<(), EndpointFailure> {
    if is_address(address) {
        Ok(())
    } else {
        Err(invalid_request(endpoint, format!("Account '{}' is not a 20-byte hex address", address)))
    }
}

/// Use the configured spelling of `address` when the node returns it in another case.
fn normalize_party(party: &str, address: &str) -> String {
    if party.eq_ignore_ascii_case(address) {
        address.to_string()
    } else {
        party.to_string()
    }
}

#[async_trait]
impl ChainClient for EvmJsonRpcClient {
    async fn native_balance(
        &self,
        endpoint: &str,
        chain: &ChainConfig,
        address: &str,
    ) -> Result<Decimal, EndpointFailure> {
        check_account(endpoint, address)?;
        let wei = self.call_quantity(endpoint, "eth_getBalance", json!([address, "latest"])).await?;
        Ok(to_decimal(wei, chain.decimals))
    }

    async fn token_balance(
        &self,
        endpoint: &str,
        token: &TokenConfig,
        address: &str,
    ) -> Result<Decimal, EndpointFailure> {
        if !is_address(&token.contract) {
            return Err(invalid_request(
                endpoint,
                format!("Token {} has no valid contract address: '{}'", token.symbol, token.contract),
            ));
        }
        let data =
            encode_balance_of(address).map_err(|message| invalid_request(endpoint, message))?;
        let raw = self
            .call_quantity(
                endpoint,
                "eth_call",
                json!([{ "to": token.contract, "data": data }, "latest"]),
            )
            .await?;
        Ok(to_decimal(raw, token.decimals))
    }

    async fn recent_transactions(
        &self,
        endpoint: &str,
        chain: &ChainConfig,
        address: &str,
    ) -> Result<Vec<TxInfo>, EndpointFailure> {
        check_account(endpoint, address)?;
        if chain.tx_scan_blocks == 0 {
            return Ok(Vec::new());
        }

        let latest = self.call_quantity(endpoint, "eth_blockNumber", json!([])).await?;
        let latest = u64::try_from(latest)
            .map_err(|_| malformed(endpoint, format!("block number {} out of range", latest)))?;
        let oldest = latest.saturating_sub(chain.tx_scan_blocks.saturating_sub(1));

        let mut found = Vec::new();
        for number in (oldest..=latest).rev() {
            let result = self
                .call(endpoint, "eth_getBlockByNumber", json!([encode_quantity(number), true]))
                .await?;
            let block: RpcBlock = serde_json::from_value(result)
                .map_err(|e| malformed(endpoint, format!("eth_getBlockByNumber: {}", e)))?;

            for tx in block.transactions {
                let to = tx.to.unwrap_or_default();
                if !tx.from.eq_ignore_ascii_case(address) && !to.eq_ignore_ascii_case(address) {
                    continue;
                }
                let value = match tx.value.as_deref() {
                    Some(raw) => Some(
                        parse_quantity(raw)
                            .map(|v| to_decimal(v, chain.decimals))
                            .map_err(|message| malformed(endpoint, message))?,
                    ),
                    None => None,
                };
                found.push(TxInfo {
                    hash: tx.hash,
                    from: normalize_party(&tx.from, address),
                    to: normalize_party(&to, address),
                    chain: chain.name.clone(),
                    value,
                    block_number: Some(number),
                });
            }
        }

        tracing::debug!(
            endpoint = %endpoint,
            chain = %chain.name,
            blocks = latest - oldest + 1,
            matched = found.len(),
            "Scanned recent blocks"
        );
        Ok(found)
    }
}
