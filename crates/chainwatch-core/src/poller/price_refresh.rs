use chainwatch_types::ChainConfig;

use crate::error::AppResult;
use crate::pricing::{feed_ids, PriceBook, PriceOracle, PriceTable};
use crate::telemetry;

/// Fetch prices for every configured feed id and publish them.
///
/// On error nothing is published and the previous table stays current.
/// Returns the number of prices published.
pub async fn refresh_prices(
    oracle: &dyn PriceOracle,
    chains: &[ChainConfig],
    book: &PriceBook,
) -> AppResult<usize> {
    let ids = feed_ids(chains);
    if ids.is_empty() {
        return Ok(0);
    }

    match oracle.fetch_prices(&ids).await {
        Ok(prices) => {
            let table = PriceTable::new(prices);
            let count = table.len();
            book.publish(table);
            telemetry::record_price_refresh("success");
            tracing::info!(requested = ids.len(), published = count, "Price table refreshed");
            Ok(count)
        },
        Err(e) => {
            telemetry::record_price_refresh("error");
            tracing::warn!(requested = ids.len(), "Price refresh failed, keeping previous table: {}", e);
            Err(e)
        },
    }
}
