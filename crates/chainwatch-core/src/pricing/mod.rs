//! Quote-currency prices.
//!
//! A [`PriceTable`] is an immutable snapshot; the [`PriceBook`] publishes a
//! new one by full replacement so readers never see a half-updated table.

mod oracle;
mod table;

pub use oracle::{feed_ids, CoinGeckoOracle, PriceOracle};
pub use table::{PriceBook, PriceTable};
