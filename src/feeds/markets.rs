//! CoinGecko `/coins/markets` feed (array of market objects)

use super::require;
use crate::{
    constants::COINGECKO_MARKETS_ENDPOINT,
    error::FetchError,
    types::{ChangeFields, ChangeWindow, CoinSet, PriceSnapshot},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct MarketEntry {
    id: Option<String>,
    current_price: Option<f64>,
    price_change_percentage_1h_in_currency: Option<f64>,
    price_change_percentage_24h_in_currency: Option<f64>,
    price_change_percentage_7d_in_currency: Option<f64>,
}

impl MarketEntry {
    fn to_snapshot(
        &self,
        feed_id: &str,
        changes: ChangeFields,
    ) -> Result<PriceSnapshot, FetchError> {
        let price = require(self.current_price, "current_price", feed_id)?;
        let mut snapshot = PriceSnapshot::new(price);
        for window in changes.windows() {
            let (value, field) = match window {
                ChangeWindow::OneHour => (
                    self.price_change_percentage_1h_in_currency,
                    "price_change_percentage_1h_in_currency",
                ),
                ChangeWindow::OneDay => (
                    self.price_change_percentage_24h_in_currency,
                    "price_change_percentage_24h_in_currency",
                ),
                ChangeWindow::SevenDays => (
                    self.price_change_percentage_7d_in_currency,
                    "price_change_percentage_7d_in_currency",
                ),
            };
            snapshot = snapshot.with_change(*window, require(value, field, feed_id)?);
        }
        Ok(snapshot)
    }
}

pub fn build_url(base_url: &str, coins: &CoinSet, changes: ChangeFields) -> String {
    let mut url = format!(
        "{}{}?vs_currency=usd&ids={}",
        base_url,
        COINGECKO_MARKETS_ENDPOINT,
        coins.feed_ids()
    );
    let windows = changes.windows();
    if !windows.is_empty() {
        let labels = windows
            .iter()
            .map(|w| w.label())
            .collect::<Vec<_>>()
            .join(",");
        url.push_str("&price_change_percentage=");
        url.push_str(&labels);
    }
    url
}

/// Parses a market array
///
/// When every element has an `"id"`, elements are matched to coins by id.
/// Otherwise the array must be in coin-set order with exactly one element
/// per coin.
pub fn parse(
    body: &str,
    coins: &CoinSet,
    changes: ChangeFields,
) -> Result<Vec<PriceSnapshot>, FetchError> {
    let entries: Vec<MarketEntry> = serde_json::from_str(body)
        .map_err(|e| FetchError::parse(format!("Failed to parse markets response: {}", e)))?;

    let mut slots: Vec<Option<PriceSnapshot>> = vec![None; coins.len()];

    if !entries.is_empty() && entries.iter().all(|e| e.id.is_some()) {
        for entry in &entries {
            let id = entry.id.as_deref().unwrap_or_default();
            if let Some(index) = coins.position_of(id) {
                slots[index] = Some(entry.to_snapshot(id, changes)?);
            }
        }
    } else {
        if entries.len() != coins.len() {
            return Err(FetchError::parse(format!(
                "expected {} market entries, got {}",
                coins.len(),
                entries.len()
            )));
        }
        for ((slot, entry), coin) in slots.iter_mut().zip(&entries).zip(coins.iter()) {
            *slot = Some(entry.to_snapshot(coin.feed_id, changes)?);
        }
    }

    slots
        .into_iter()
        .zip(coins.iter())
        .map(|(slot, coin)| {
            slot.ok_or_else(|| FetchError::parse(format!("no entry for {}", coin.feed_id)))
        })
        .collect()
}
