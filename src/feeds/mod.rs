//! Price-feed request building and response parsing
//!
//! Parsers never touch the price table. They build a complete candidate
//! table and fail as a whole if any coin is missing a required field.

pub mod markets;
pub mod simple_price;

use crate::{
    config::ResponseShape,
    error::FetchError,
    types::{ChangeFields, CoinSet, PriceSnapshot},
};

impl ResponseShape {
    /// Builds the request URL for `coins` under `base_url`
    pub fn build_url(&self, base_url: &str, coins: &CoinSet, changes: ChangeFields) -> String {
        match self {
            ResponseShape::SimplePrice => simple_price::build_url(base_url, coins, changes),
            ResponseShape::Markets => markets::build_url(base_url, coins, changes),
        }
    }

    /// Parses `body` into one snapshot per coin, in coin-set order
    pub fn parse(
        &self,
        body: &str,
        coins: &CoinSet,
        changes: ChangeFields,
    ) -> Result<Vec<PriceSnapshot>, FetchError> {
        match self {
            ResponseShape::SimplePrice => simple_price::parse(body, coins, changes),
            ResponseShape::Markets => markets::parse(body, coins, changes),
        }
    }

    /// Whether this shape can carry the requested change fields
    pub fn supports(&self, changes: ChangeFields) -> bool {
        match self {
            ResponseShape::SimplePrice => changes != ChangeFields::HourDayWeek,
            ResponseShape::Markets => true,
        }
    }
}

/// Unwraps a required numeric field
fn require(value: Option<f64>, field: &str, feed_id: &str) -> Result<f64, FetchError> {
    value.ok_or_else(|| FetchError::parse(format!("missing \"{}\" for {}", field, feed_id)))
}
