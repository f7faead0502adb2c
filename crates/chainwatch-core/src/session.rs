//! Session state shared by the pollers and the presentation layer.
//!
//! ```text
//! ┌──────────────────────── MonitorSession ────────────────────────┐
//! │ chains (immutable)      registry: Arc<RpcHealthRegistry>       │
//! │ prices: PriceBook       accounts: RwLock<Vec<AccountState>>    │
//! │ tx_filter: RwLock       privacy: AtomicBool                    │
//! └────────────────────────────────────────────────────────────────┘
//!        ▲ writes                                   ▲ reads
//!   poller (accounts, prices)               daemon log lines / views
//! ```
//!
//! Account order is insertion order. Readers get clones, so a view never
//! holds a lock across an await point.

use chainwatch_types::{AccountState, ChainConfig, MonitorConfig, TxFilter, TxInfo};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::display;
use crate::portfolio;
use crate::pricing::PriceBook;
use crate::rpc::{prioritize, FailoverConfig, FailoverRunner, RpcHealthRegistry};
use crate::telemetry;

pub struct MonitorSession {
    chains: Vec<ChainConfig>,
    failover: FailoverConfig,
    registry: Arc<RpcHealthRegistry>,
    prices: PriceBook,
    accounts: RwLock<Vec<AccountState>>,
    tx_filter: RwLock<TxFilter>,
    privacy: AtomicBool,
}

impl MonitorSession {
    /// Build a session from config. Duplicate addresses are monitored once.
    pub fn new(config: &MonitorConfig) -> Self {
        let session = Self {
            chains: config.chains.clone(),
            failover: FailoverConfig::from(config),
            registry: Arc::new(RpcHealthRegistry::new()),
            prices: PriceBook::new(),
            accounts: RwLock::new(Vec::with_capacity(config.accounts.len())),
            tx_filter: RwLock::new(config.tx_filter),
            privacy: AtomicBool::new(config.privacy_mode),
        };
        for address in &config.accounts {
            session.add_account(address);
        }
        session
    }

    pub fn chains(&self) -> &[ChainConfig] {
        &self.chains
    }

    pub fn chain(&self, name: &str) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.name == name)
    }

    pub fn registry(&self) -> &Arc<RpcHealthRegistry> {
        &self.registry
    }

    pub fn prices(&self) -> &PriceBook {
        &self.prices
    }

    /// A runner bound to this session's registry.
    pub fn failover_runner(&self) -> FailoverRunner {
        FailoverRunner::new(Arc::clone(&self.registry), self.failover)
    }

    // ===== Accounts =====

    /// Start monitoring `address`. Returns `false` if it is already monitored.
    pub fn add_account(&self, address: &str) -> bool {
        let mut accounts = self.accounts.write();
        if accounts.iter().any(|a| a.address == address) {
            return false;
        }
        accounts.push(AccountState::new(address));
        telemetry::update_account_gauge(accounts.len());
        tracing::info!(account = %address, "Account added");
        true
    }

    /// Stop monitoring `address`. Returns `false` if it was not monitored.
    pub fn remove_account(&self, address: &str) -> bool {
        let mut accounts = self.accounts.write();
        let before = accounts.len();
        accounts.retain(|a| a.address != address);
        let removed = accounts.len() != before;
        if removed {
            telemetry::update_account_gauge(accounts.len());
            tracing::info!(account = %address, "Account removed");
        }
        removed
    }

    pub fn account(&self, address: &str) -> Option<AccountState> {
        self.accounts.read().iter().find(|a| a.address == address).cloned()
    }

    pub fn accounts(&self) -> Vec<AccountState> {
        self.accounts.read().clone()
    }

    pub fn addresses(&self) -> Vec<String> {
        self.accounts.read().iter().map(|a| a.address.clone()).collect()
    }

    /// Apply `update` to the stored state of `address`.
    ///
    /// Returns `false` when the account was removed in the meantime; the
    /// update is then dropped.
    pub fn update_account<F>(&self, address: &str, update: F) -> bool
    where
        F: FnOnce(&mut AccountState),
    {
        let mut accounts = self.accounts.write();
        match accounts.iter_mut().find(|a| a.address == address) {
            Some(account) => {
                update(account);
                true
            },
            None => false,
        }
    }

    // ===== Queries =====

    /// Current attempt order for a chain's endpoints. Unknown chains yield
    /// an empty list.
    pub fn get_prioritized_rpcs(&self, chain_name: &str) -> Vec<String> {
        self.chain(chain_name)
            .map(|chain| prioritize(&chain.rpc_urls, &self.registry, Instant::now()))
            .unwrap_or_default()
    }

    /// Transactions of `address` under the session's current filter.
    pub fn get_filtered_transactions(&self, address: &str) -> Vec<TxInfo> {
        let filter = self.tx_filter();
        let accounts = self.accounts.read();
        accounts
            .iter()
            .find(|a| a.address == address)
            .map(|account| {
                portfolio::filter_transactions(account, filter).into_iter().cloned().collect()
            })
            .unwrap_or_default()
    }

    /// Value of `address` against the latest published price table.
    /// Unknown accounts are worth zero.
    pub fn calculate_account_total(&self, address: &str) -> Decimal {
        let prices = self.prices.snapshot();
        let accounts = self.accounts.read();
        accounts
            .iter()
            .find(|a| a.address == address)
            .map_or(Decimal::ZERO, |account| {
                portfolio::calculate_account_total(account, &self.chains, &prices)
            })
    }

    /// Sum over every monitored account.
    pub fn portfolio_total(&self) -> Decimal {
        let prices = self.prices.snapshot();
        let accounts = self.accounts.read();
        accounts.iter().fold(Decimal::ZERO, |total, account| {
            let value = portfolio::calculate_account_total(account, &self.chains, &prices);
            total.checked_add(value).unwrap_or(total)
        })
    }

    // ===== View settings =====

    pub fn tx_filter(&self) -> TxFilter {
        *self.tx_filter.read()
    }

    pub fn set_tx_filter(&self, filter: TxFilter) {
        *self.tx_filter.write() = filter;
    }

    /// Advance all → in → out → all. Returns the new filter.
    pub fn cycle_tx_filter(&self) -> TxFilter {
        let mut filter = self.tx_filter.write();
        *filter = filter.next();
        *filter
    }

    pub fn privacy_mode(&self) -> bool {
        self.privacy.load(Ordering::Relaxed)
    }

    /// Flip privacy mode. Returns the new value.
    pub fn toggle_privacy(&self) -> bool {
        !self.privacy.fetch_xor(true, Ordering::Relaxed)
    }

    pub fn mask_string(&self, s: &str) -> String {
        display::mask_string(s, self.privacy_mode())
    }

    pub fn mask_address(&self, address: &str) -> String {
        display::mask_address(address, self.privacy_mode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PriceTable;
    use chainwatch_types::TokenConfig;
    use std::time::Duration;

    fn config() -> MonitorConfig {
        MonitorConfig {
            chains: vec![ChainConfig::new("Ethereum", "ethereum")
                .with_rpc_urls(vec!["A".to_string(), "B".to_string(), "C".to_string()])
                .with_token(TokenConfig::new("USDC", "usd-coin"))],
            accounts: vec!["0xMyAddress".to_string(), "0xMyAddress".to_string()],
            ..MonitorConfig::default()
        }
    }

    #[test]
    fn test_accounts_deduplicated_and_ordered() {
        let session = MonitorSession::new(&config());
        assert_eq!(session.addresses(), vec!["0xMyAddress"]);

        assert!(session.add_account("0xSecond"));
        assert!(!session.add_account("0xSecond"));
        assert_eq!(session.addresses(), vec!["0xMyAddress", "0xSecond"]);

        assert!(session.remove_account("0xMyAddress"));
        assert!(!session.remove_account("0xMyAddress"));
        assert_eq!(session.addresses(), vec!["0xSecond"]);
        assert!(session.account("0xMyAddress").is_none());
    }

    #[test]
    fn test_update_removed_account_is_dropped() {
        let session = MonitorSession::new(&config());
        assert!(!session.update_account("0xGone", |a| {
            a.balances.insert("Ethereum".to_string(), Decimal::ONE);
        }));
    }

    #[test]
    fn test_filter_cycle_and_filtered_view() {
        let session = MonitorSession::new(&config());
        session.update_account("0xMyAddress", |a| {
            a.transactions = vec![
                TxInfo::new("0x1", "0xMyAddress", "0xOther"),
                TxInfo::new("0x2", "0xOther", "0xMyAddress"),
                TxInfo::new("0x3", "0xOther", "0xOther"),
            ];
        });

        assert_eq!(session.tx_filter(), TxFilter::All);
        assert_eq!(session.get_filtered_transactions("0xMyAddress").len(), 3);

        assert_eq!(session.cycle_tx_filter(), TxFilter::In);
        let ins: Vec<_> =
            session.get_filtered_transactions("0xMyAddress").into_iter().map(|t| t.hash).collect();
        assert_eq!(ins, vec!["0x2", "0x3"]);

        assert_eq!(session.cycle_tx_filter(), TxFilter::Out);
        assert_eq!(session.get_filtered_transactions("0xMyAddress").len(), 1);

        assert_eq!(session.cycle_tx_filter(), TxFilter::All);
        session.set_tx_filter(TxFilter::Out);
        assert_eq!(session.tx_filter(), TxFilter::Out);
        assert!(session.get_filtered_transactions("0xUnknown").is_empty());
    }

    #[test]
    fn test_totals_use_published_prices() {
        let session = MonitorSession::new(&config());
        session.update_account("0xMyAddress", |a| {
            a.balances.insert("Ethereum".to_string(), Decimal::new(15, 1));
            a.token_balances
                .entry("Ethereum".to_string())
                .or_default()
                .insert("USDC".to_string(), Decimal::from(100));
        });

        assert_eq!(session.calculate_account_total("0xMyAddress"), Decimal::ZERO);

        session.prices().publish(PriceTable::from_iter([
            ("ethereum".to_string(), 2000.0),
            ("usd-coin".to_string(), 1.0),
        ]));
        assert_eq!(session.calculate_account_total("0xMyAddress"), Decimal::from(3100));
        assert_eq!(session.portfolio_total(), Decimal::from(3100));
        assert_eq!(session.calculate_account_total("0xUnknown"), Decimal::ZERO);
    }

    #[test]
    fn test_prioritized_rpcs_follow_registry() {
        let session = MonitorSession::new(&config());
        let now = Instant::now();
        session.registry().record_success("B", Duration::from_millis(100));
        session.registry().record_success("C", Duration::from_millis(50));
        session.registry().record_failure_at("A", Duration::from_secs(60), now, None);

        assert_eq!(session.get_prioritized_rpcs("Ethereum"), vec!["C", "B", "A"]);
        assert!(session.get_prioritized_rpcs("Solana").is_empty());
    }

    #[test]
    fn test_privacy_toggle_masks_output() {
        let session = MonitorSession::new(&config());
        assert!(!session.privacy_mode());
        assert_eq!(session.mask_address("0x123456"), "0x123456");

        assert!(session.toggle_privacy());
        assert_eq!(session.mask_string("100"), "****");
        assert_eq!(session.mask_address("0x123456"), "0x**...**");

        assert!(!session.toggle_privacy());
        assert_eq!(session.mask_string("100"), "100");
    }
}
