//! Per-cycle snapshot log lines.

use std::sync::Arc;
use std::time::Instant;

use chainwatch_core::display::{format_decimal, truncate_string};
use chainwatch_core::poller::Poller;
use chainwatch_core::portfolio::classify;
use chainwatch_core::rpc::HealthStatus;
use chainwatch_core::MonitorSession;
use tokio::task::JoinHandle;

const ADDRESS_WIDTH: usize = 14;
const HASH_WIDTH: usize = 18;

/// Log a snapshot every time the poller completes a cycle.
pub fn spawn_reporter(poller: &Arc<Poller>) -> JoinHandle<()> {
    let mut cycles = poller.subscribe_cycles();
    let cancel = poller.cancel_token();
    let session = Arc::clone(poller.session());

    tokio::spawn(async move {
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                changed = cycles.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let cycle = *cycles.borrow_and_update();
                    log_snapshot(&session, cycle);
                }
            }
        }
    })
}

pub fn log_snapshot(session: &MonitorSession, cycle: u64) {
    let prices = session.prices().snapshot();
    tracing::info!(
        cycle,
        prices = prices.len(),
        total_usd = %session.mask_string(&format_decimal(Some(&session.portfolio_total()), 2)),
        "Portfolio snapshot"
    );

    let filter = session.tx_filter();
    for account in session.accounts() {
        let shown = session.mask_address(&truncate_string(&account.address, ADDRESS_WIDTH));
        let total = session.calculate_account_total(&account.address);
        tracing::info!(
            account = %shown,
            total_usd = %session.mask_string(&format_decimal(Some(&total), 2)),
            "Account value"
        );

        for chain in session.chains() {
            let native = format_decimal(account.balance(&chain.name), 6);
            tracing::info!(
                account = %shown,
                chain = %chain.name,
                balance = %session.mask_string(&native),
                "Native balance"
            );
            for token in &chain.tokens {
                let balance = format_decimal(account.token_balance(&chain.name, &token.symbol), 4);
                tracing::info!(
                    account = %shown,
                    chain = %chain.name,
                    token = %token.symbol,
                    balance = %session.mask_string(&balance),
                    "Token balance"
                );
            }
        }

        let txs = session.get_filtered_transactions(&account.address);
        tracing::info!(account = %shown, filter = %filter, count = txs.len(), "Recent transactions");
        for tx in txs {
            tracing::debug!(
                account = %shown,
                chain = %tx.chain,
                hash = %truncate_string(&tx.hash, HASH_WIDTH),
                direction = %classify(&tx, &account.address),
                "Transaction"
            );
        }
    }

    let now = Instant::now();
    for endpoint in session.registry().snapshot(now) {
        if endpoint.status == HealthStatus::CoolingDown {
            tracing::info!(
                endpoint = %endpoint.endpoint,
                cooldown_remaining_ms = endpoint.cooldown_remaining_ms.unwrap_or(0),
                last_error = endpoint.last_error.as_deref().unwrap_or(""),
                "Endpoint cooling down"
            );
        } else {
            tracing::debug!(
                endpoint = %endpoint.endpoint,
                status = %endpoint.status,
                latency_ms = endpoint.latency_ms.unwrap_or(0),
                "Endpoint health"
            );
        }
    }
}
