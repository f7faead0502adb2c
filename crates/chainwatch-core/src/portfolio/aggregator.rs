//! Quote-currency valuation of account balances.
//!
//! All arithmetic stays in `Decimal`. Prices arrive as `f64` and are promoted
//! once per multiplication; [`to_display_f64`] is the only lossy step back.
//! A balance whose feed id has no price contributes exactly zero.

use chainwatch_types::{AccountState, ChainConfig};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::pricing::PriceTable;

/// `balance × price(feed_id)`, or zero when the feed has no usable price.
pub fn value_of(balance: &Decimal, feed_id: &str, prices: &PriceTable) -> Decimal {
    let Some(price) = prices.get(feed_id).and_then(Decimal::from_f64) else {
        return Decimal::ZERO;
    };
    balance.checked_mul(price).unwrap_or_else(|| {
        tracing::warn!(feed_id = %feed_id, "Balance × price overflowed; valued at zero");
        Decimal::ZERO
    })
}

fn accumulate(total: Decimal, value: Decimal) -> Decimal {
    total.checked_add(value).unwrap_or_else(|| {
        tracing::warn!("Account total overflowed; ignoring contribution");
        total
    })
}

/// Value of one chain's holdings (native plus tokens) for `account`.
pub fn chain_value(account: &AccountState, chain: &ChainConfig, prices: &PriceTable) -> Decimal {
    let mut total = account
        .balances
        .get(&chain.name)
        .map(|balance| value_of(balance, &chain.price_feed_id, prices))
        .unwrap_or(Decimal::ZERO);

    if let Some(tokens) = account.token_balances.get(&chain.name) {
        for (symbol, balance) in tokens {
            if let Some(token) = chain.token(symbol) {
                total = accumulate(total, value_of(balance, &token.price_feed_id, prices));
            }
        }
    }
    total
}

/// Total value of every native and token balance held by `account`.
///
/// Chains or tokens missing from `chains` have no feed id and count as zero.
pub fn calculate_account_total(
    account: &AccountState,
    chains: &[ChainConfig],
    prices: &PriceTable,
) -> Decimal {
    let find_chain = |name: &str| chains.iter().find(|c| c.name == name);
    let mut total = Decimal::ZERO;

    for (chain_name, balance) in &account.balances {
        if let Some(chain) = find_chain(chain_name) {
            total = accumulate(total, value_of(balance, &chain.price_feed_id, prices));
        }
    }

    for (chain_name, tokens) in &account.token_balances {
        let Some(chain) = find_chain(chain_name) else {
            continue;
        };
        for (symbol, balance) in tokens {
            if let Some(token) = chain.token(symbol) {
                total = accumulate(total, value_of(balance, &token.price_feed_id, prices));
            }
        }
    }

    total
}

/// Lossy conversion for display.
pub fn to_display_f64(value: &Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}
