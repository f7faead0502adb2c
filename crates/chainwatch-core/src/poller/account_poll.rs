//! One refresh of one account across every configured chain.

use chainwatch_types::{AccountState, ChainConfig, QueryError};
use chrono::Utc;
use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::rpc::{ChainClient, ChainSnapshot, FailoverRunner};
use crate::telemetry;

/// Outcome of one pass for one chain.
pub type ChainPollResult = Result<ChainSnapshot, QueryError>;

/// What happened to an account during one poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountPollReport {
    pub address: String,
    /// Chains whose entries were replaced
    pub refreshed: Vec<String>,
    /// Chains whose pass failed; their previous entries were kept
    pub failed: Vec<(String, QueryError)>,
}

impl AccountPollReport {
    pub fn all_failed(&self) -> bool {
        self.refreshed.is_empty() && !self.failed.is_empty()
    }

    pub fn was_cancelled(&self) -> bool {
        self.failed.iter().any(|(_, e)| matches!(e, QueryError::Cancelled))
    }
}

/// Run one failover pass per chain for `address`. Chains are polled
/// concurrently; results come back in `chains` order.
pub async fn poll_account(
    runner: &FailoverRunner,
    client: &dyn ChainClient,
    chains: &[ChainConfig],
    address: &str,
    cancel: &CancellationToken,
) -> Vec<(String, ChainPollResult)> {
    let timeout = runner.config().attempt_timeout;

    let passes = chains.iter().map(|chain| async move {
        let result = runner
            .attempt_query_with(&chain.rpc_urls, timeout, cancel, |endpoint| async move {
                client.fetch_snapshot(&endpoint, chain, address).await
            })
            .await;

        match &result {
            Ok(outcome) => tracing::debug!(
                account = %address,
                chain = %chain.name,
                endpoint = %outcome.endpoint,
                latency_ms = outcome.latency.as_millis() as u64,
                attempts = outcome.attempts,
                "Chain refreshed"
            ),
            Err(QueryError::Cancelled) => {},
            Err(e) => {
                if matches!(e, QueryError::AllEndpointsExhausted { .. }) {
                    telemetry::record_exhausted(&chain.name);
                }
                tracing::warn!(
                    account = %address,
                    chain = %chain.name,
                    "Chain refresh failed, keeping last known data: {}",
                    e
                );
            },
        }

        (chain.name.clone(), result.map(|outcome| outcome.value))
    });

    join_all(passes).await
}

/// Merge per-chain results into `account`.
///
/// A successful chain replaces its native balance, token balances and
/// transactions. A failed chain keeps all three. The transaction list is
/// rebuilt in `chains` order; transactions of chains not in `chains` stay at
/// the end.
pub fn apply_chain_results(
    account: &mut AccountState,
    chains: &[ChainConfig],
    results: Vec<(String, ChainPollResult)>,
) -> AccountPollReport {
    let mut report = AccountPollReport { address: account.address.clone(), ..Default::default() };
    let mut fresh_txs = std::collections::HashMap::new();

    for (chain_name, result) in results {
        match result {
            Ok(snapshot) => {
                account.balances.insert(chain_name.clone(), snapshot.native_balance);
                account.token_balances.insert(chain_name.clone(), snapshot.token_balances);
                let txs: Vec<_> = snapshot
                    .transactions
                    .into_iter()
                    .map(|tx| tx.on_chain(chain_name.clone()))
                    .collect();
                fresh_txs.insert(chain_name.clone(), txs);
                report.refreshed.push(chain_name);
            },
            Err(e) => report.failed.push((chain_name, e)),
        }
    }

    if report.refreshed.is_empty() {
        return report;
    }

    let mut previous = std::mem::take(&mut account.transactions);
    let mut rebuilt = Vec::with_capacity(previous.len());
    for chain in chains {
        match fresh_txs.remove(&chain.name) {
            Some(txs) => {
                previous.retain(|tx| tx.chain != chain.name);
                rebuilt.extend(txs);
            },
            None => {
                let (kept, rest): (Vec<_>, Vec<_>) =
                    previous.into_iter().partition(|tx| tx.chain == chain.name);
                rebuilt.extend(kept);
                previous = rest;
            },
        }
    }
    rebuilt.extend(previous);

    account.transactions = rebuilt;
    account.last_updated = Some(Utc::now());
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainwatch_types::{TokenConfig, TxInfo};
    use rust_decimal::Decimal;
    use std::collections::HashMap;

    fn chains() -> Vec<ChainConfig> {
        vec![
            ChainConfig::new("Ethereum", "ethereum").with_token(TokenConfig::new("USDC", "usd-coin")),
            ChainConfig::new("Polygon", "matic-network"),
        ]
    }

    fn seeded_account() -> AccountState {
        let mut acc = AccountState::new("0xMe");
        acc.balances.insert("Ethereum".to_string(), Decimal::ONE);
        acc.balances.insert("Polygon".to_string(), Decimal::from(7));
        acc.token_balances.insert(
            "Ethereum".to_string(),
            HashMap::from([("USDC".to_string(), Decimal::from(5))]),
        );
        acc.transactions = vec![
            TxInfo::new("old-poly", "0xMe", "0xA").on_chain("Polygon"),
            TxInfo::new("old-eth", "0xB", "0xMe").on_chain("Ethereum"),
        ];
        acc
    }

    fn snapshot(native: i64, txs: &[&str]) -> ChainSnapshot {
        ChainSnapshot {
            native_balance: Decimal::from(native),
            token_balances: HashMap::from([("USDC".to_string(), Decimal::from(9))]),
            transactions: txs.iter().map(|h| TxInfo::new(*h, "0xMe", "0xC")).collect(),
        }
    }

    fn exhausted() -> ChainPollResult {
        Err(QueryError::AllEndpointsExhausted { attempts: 2 })
    }

    #[test]
    fn test_all_failed_leaves_account_unchanged() {
        let mut acc = seeded_account();
        let before = acc.clone();

        let report = apply_chain_results(
            &mut acc,
            &chains(),
            vec![("Ethereum".to_string(), exhausted()), ("Polygon".to_string(), exhausted())],
        );

        assert_eq!(acc, before);
        assert!(report.all_failed());
        assert_eq!(report.failed.len(), 2);
    }

    #[test]
    fn test_partial_success_replaces_only_that_chain() {
        let mut acc = seeded_account();

        let report = apply_chain_results(
            &mut acc,
            &chains(),
            vec![
                ("Ethereum".to_string(), Ok(snapshot(3, &["new-eth"]))),
                ("Polygon".to_string(), exhausted()),
            ],
        );

        assert_eq!(report.refreshed, vec!["Ethereum"]);
        assert_eq!(acc.balance("Ethereum"), Some(&Decimal::from(3)));
        assert_eq!(acc.token_balance("Ethereum", "USDC"), Some(&Decimal::from(9)));
        assert_eq!(acc.balance("Polygon"), Some(&Decimal::from(7)));

        let hashes: Vec<_> = acc.transactions.iter().map(|t| t.hash.as_str()).collect();
        assert_eq!(hashes, vec!["new-eth", "old-poly"]);
        assert_eq!(acc.transactions[0].chain, "Ethereum");
        assert!(acc.last_updated.is_some());
    }

    #[test]
    fn test_transactions_rebuilt_in_chain_order() {
        let mut acc = seeded_account();
        acc.transactions.push(TxInfo::new("orphan", "0xMe", "0xD").on_chain("Retired"));

        apply_chain_results(
            &mut acc,
            &chains(),
            vec![
                ("Ethereum".to_string(), Ok(snapshot(1, &["e1", "e2"]))),
                ("Polygon".to_string(), Ok(snapshot(2, &["p1"]))),
            ],
        );

        let hashes: Vec<_> = acc.transactions.iter().map(|t| t.hash.as_str()).collect();
        assert_eq!(hashes, vec!["e1", "e2", "p1", "orphan"]);
    }

    #[test]
    fn test_cancelled_report() {
        let mut acc = seeded_account();
        let report = apply_chain_results(
            &mut acc,
            &chains(),
            vec![("Ethereum".to_string(), Err(QueryError::Cancelled))],
        );
        assert!(report.was_cancelled());
        assert_eq!(acc, seeded_account());
    }
}
