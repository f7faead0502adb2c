//! Account valuation and transaction classification.

mod aggregator;
mod classifier;

pub use aggregator::{calculate_account_total, chain_value, to_display_f64, value_of};
pub use classifier::{classify, filter_transactions, is_incoming, is_outgoing};
