//! CoinGecko `/simple/price` feed (flat map keyed by coin id)

use super::require;
use crate::{
    constants::COINGECKO_SIMPLE_PRICE_ENDPOINT,
    error::FetchError,
    types::{ChangeFields, ChangeWindow, CoinSet, PriceSnapshot},
};
use serde::Deserialize;
use std::collections::HashMap;

/// CoinGecko API response for simple price queries
type SimplePriceResponse = HashMap<String, SimplePriceEntry>;

#[derive(Debug, Deserialize)]
struct SimplePriceEntry {
    usd: Option<f64>,
    usd_24h_change: Option<f64>,
}

pub fn build_url(base_url: &str, coins: &CoinSet, changes: ChangeFields) -> String {
    let mut url = format!(
        "{}{}?ids={}&vs_currencies=usd",
        base_url,
        COINGECKO_SIMPLE_PRICE_ENDPOINT,
        coins.feed_ids()
    );
    if changes.windows().contains(&ChangeWindow::OneDay) {
        url.push_str("&include_24hr_change=true");
    }
    url
}

pub fn parse(
    body: &str,
    coins: &CoinSet,
    changes: ChangeFields,
) -> Result<Vec<PriceSnapshot>, FetchError> {
    let response: SimplePriceResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::parse(format!("Failed to parse simple price response: {}", e)))?;

    coins
        .iter()
        .map(|coin| {
            let entry = response
                .get(coin.feed_id)
                .ok_or_else(|| FetchError::parse(format!("no entry for {}", coin.feed_id)))?;

            let mut snapshot = PriceSnapshot::new(require(entry.usd, "usd", coin.feed_id)?);
            for window in changes.windows() {
                let percent = match window {
                    ChangeWindow::OneDay => {
                        require(entry.usd_24h_change, "usd_24h_change", coin.feed_id)?
                    }
                    other => {
                        return Err(FetchError::parse(format!(
                            "{} change not available from simple price feed",
                            other.label()
                        )))
                    }
                };
                snapshot = snapshot.with_change(*window, percent);
            }
            Ok(snapshot)
        })
        .collect()
}
