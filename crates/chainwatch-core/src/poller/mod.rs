//! Background refresh loops.
//!
//! ```text
//!            ┌────────────── Poller ──────────────┐
//!  interval ─┤ poll_cycle: accounts × chains      ├─► MonitorSession.accounts
//!  interval ─┤ refresh_prices: all feed ids       ├─► MonitorSession.prices
//!            └──────────── CancellationToken ─────┘
//! ```
//!
//! Both loops stop when the token is cancelled. An in-flight pass stops
//! before its next candidate and leaves the registry and account untouched.

mod account_poll;
mod price_refresh;

pub use account_poll::{apply_chain_results, poll_account, AccountPollReport, ChainPollResult};
pub use price_refresh::refresh_prices;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::AppResult;
use crate::pricing::PriceOracle;
use crate::rpc::ChainClient;
use crate::session::MonitorSession;

/// Drives account polling and price refreshes for one session.
pub struct Poller {
    session: Arc<MonitorSession>,
    client: Arc<dyn ChainClient>,
    oracle: Arc<dyn PriceOracle>,
    cancel: CancellationToken,
    cycles_tx: watch::Sender<u64>,
}

impl Poller {
    pub fn new(
        session: Arc<MonitorSession>,
        client: Arc<dyn ChainClient>,
        oracle: Arc<dyn PriceOracle>,
    ) -> Arc<Self> {
        let (cycles_tx, _) = watch::channel(0);
        Arc::new(Self { session, client, oracle, cancel: CancellationToken::new(), cycles_tx })
    }

    pub fn session(&self) -> &Arc<MonitorSession> {
        &self.session
    }

    /// Token that stops both loops and any in-flight pass.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Receiver of the number of completed poll cycles.
    pub fn subscribe_cycles(&self) -> watch::Receiver<u64> {
        self.cycles_tx.subscribe()
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Poll every monitored account once.
    pub async fn poll_cycle(&self) -> Vec<AccountPollReport> {
        let runner = self.session.failover_runner();
        let chains = self.session.chains();
        let mut reports = Vec::new();

        for address in self.session.addresses() {
            if self.cancel.is_cancelled() {
                break;
            }
            let results =
                poll_account(&runner, self.client.as_ref(), chains, &address, &self.cancel).await;

            let mut report = None;
            self.session.update_account(&address, |account| {
                report = Some(apply_chain_results(account, chains, results));
            });
            match report {
                Some(report) => reports.push(report),
                None => tracing::debug!(account = %address, "Account removed during poll"),
            }
        }

        if !self.cancel.is_cancelled() {
            self.cycles_tx.send_modify(|n| *n = n.saturating_add(1));
        }
        reports
    }

    pub async fn refresh_prices(&self) -> AppResult<usize> {
        refresh_prices(self.oracle.as_ref(), self.session.chains(), self.session.prices()).await
    }

    /// Spawn the poll and price loops. The first tick of each fires at once.
    pub fn start(
        self: &Arc<Self>,
        poll_every: Duration,
        prices_every: Duration,
    ) -> Vec<JoinHandle<()>> {
        let prices = {
            let poller = Arc::clone(self);
            tokio::spawn(async move {
                tracing::info!(interval_secs = prices_every.as_secs(), "Price refresher started");
                let mut ticker = interval(prices_every);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    tokio::select! {
                        () = poller.cancel.cancelled() => break,
                        _ = ticker.tick() => {
                            // Failure is logged inside; the previous table stays published.
                            let _ = poller.refresh_prices().await;
                        }
                    }
                }
                tracing::info!("Price refresher stopped");
            })
        };

        let accounts = {
            let poller = Arc::clone(self);
            tokio::spawn(async move {
                tracing::info!(interval_secs = poll_every.as_secs(), "Account poller started");
                let mut ticker = interval(poll_every);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    tokio::select! {
                        () = poller.cancel.cancelled() => break,
                        _ = ticker.tick() => {
                            poller.poll_cycle().await;
                        }
                    }
                }
                tracing::info!("Account poller stopped");
            })
        };

        vec![prices, accounts]
    }
}
