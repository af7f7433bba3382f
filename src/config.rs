//! Ticker configuration
//!
//! Three feed variants exist: they differ in which endpoint is queried,
//! which percentage changes are shown and how many decimals a price gets.
//! [`FeedVariant`] bundles each into a ready-made [`TickerConfig`].

use crate::{
    constants::{
        COINGECKO_API_URL, IDLE_POLL_MS, RECONNECT_POLL_MS, RECONNECT_WINDOW_MS,
        REFRESH_INTERVAL_MS, REQUEST_TIMEOUT_SECS, ROTATION_INTERVAL_MS,
    },
    error::ConfigError,
    types::ChangeFields,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Layout of the price-feed response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// `{ "bitcoin": { "usd": 50000.0, "usd_24h_change": 1.2 }, ... }`
    SimplePrice,
    /// `[ { "id": "bitcoin", "current_price": 50000.0, ... }, ... ]`
    Markets,
}

/// Prices strictly above `above` are shown with `decimals` digits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrecisionBucket {
    pub above: f64,
    pub decimals: usize,
}

/// Price precision that shrinks as magnitude grows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecisionTable {
    /// Buckets ordered by descending threshold
    pub buckets: Vec<PrecisionBucket>,
    /// Decimals for prices no bucket matches
    pub fallback_decimals: usize,
}

impl PrecisionTable {
    /// >999 → 1, >9 → 2, else 4
    pub fn classic() -> Self {
        Self::from_pairs(&[(999.0, 1), (9.0, 2)], 4)
    }

    /// >9999 → 0, >999 → 1, >9 → 2, else 4
    pub fn compact() -> Self {
        Self::from_pairs(&[(9999.0, 0), (999.0, 1), (9.0, 2)], 4)
    }

    /// >9999 → 0, >999 → 2, >9 → 3, else 5
    pub fn extended() -> Self {
        Self::from_pairs(&[(9999.0, 0), (999.0, 2), (9.0, 3)], 5)
    }

    fn from_pairs(pairs: &[(f64, usize)], fallback_decimals: usize) -> Self {
        Self {
            buckets: pairs
                .iter()
                .map(|&(above, decimals)| PrecisionBucket { above, decimals })
                .collect(),
            fallback_decimals,
        }
    }

    /// Number of decimals for `price`
    pub fn decimals_for(&self, price: f64) -> usize {
        self.buckets
            .iter()
            .find(|b| price > b.above)
            .map(|b| b.decimals)
            .unwrap_or(self.fallback_decimals)
    }

    /// Formats `price` as dollars, e.g. `$42.57`
    pub fn format(&self, price: f64) -> String {
        format!("${:.*}", self.decimals_for(price), price)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sorted = self
            .buckets
            .windows(2)
            .all(|pair| pair[0].above > pair[1].above);
        if sorted {
            Ok(())
        } else {
            Err(ConfigError::UnsortedBuckets)
        }
    }
}

impl Default for PrecisionTable {
    fn default() -> Self {
        Self::classic()
    }
}

/// Named bundle of shape, change fields and precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedVariant {
    /// Flat map, price only, classic precision
    #[default]
    Simple,
    /// Flat map with 24h change, compact precision
    Simple24h,
    /// Market objects with 1h/24h/7d changes, extended precision
    Markets,
}

impl FeedVariant {
    pub fn name(&self) -> &'static str {
        match self {
            FeedVariant::Simple => "simple",
            FeedVariant::Simple24h => "simple24h",
            FeedVariant::Markets => "markets",
        }
    }
}

impl FromStr for FeedVariant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(FeedVariant::Simple),
            "simple24h" | "simple_24h" => Ok(FeedVariant::Simple24h),
            "markets" => Ok(FeedVariant::Markets),
            other => Err(ConfigError::UnknownVariant(other.to_string())),
        }
    }
}

/// All runtime settings of the ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    pub shape: ResponseShape,
    pub changes: ChangeFields,
    pub precision: PrecisionTable,
    pub rotation_interval_ms: u32,
    pub refresh_interval_ms: u32,
    pub reconnect_window_ms: u32,
    pub reconnect_poll_ms: u32,
    /// Sleep between scheduler polls; 0 only yields
    pub idle_poll_ms: u32,
    pub request_timeout_secs: u64,
    pub api_base_url: String,
}

impl TickerConfig {
    /// Default timings with the variant's shape, changes and precision
    pub fn for_variant(variant: FeedVariant) -> Self {
        let (shape, changes, precision) = match variant {
            FeedVariant::Simple => (
                ResponseShape::SimplePrice,
                ChangeFields::None,
                PrecisionTable::classic(),
            ),
            FeedVariant::Simple24h => (
                ResponseShape::SimplePrice,
                ChangeFields::Day,
                PrecisionTable::compact(),
            ),
            FeedVariant::Markets => (
                ResponseShape::Markets,
                ChangeFields::HourDayWeek,
                PrecisionTable::extended(),
            ),
        };

        Self {
            shape,
            changes,
            precision,
            rotation_interval_ms: ROTATION_INTERVAL_MS,
            refresh_interval_ms: REFRESH_INTERVAL_MS,
            reconnect_window_ms: RECONNECT_WINDOW_MS,
            reconnect_poll_ms: RECONNECT_POLL_MS,
            idle_poll_ms: IDLE_POLL_MS,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            api_base_url: COINGECKO_API_URL.to_string(),
        }
    }

    /// Checks intervals, shape/change compatibility and the precision table
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rotation_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("rotation_interval_ms"));
        }
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("refresh_interval_ms"));
        }
        if self.reconnect_poll_ms == 0 {
            return Err(ConfigError::ZeroInterval("reconnect_poll_ms"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroInterval("request_timeout_secs"));
        }
        if !self.shape.supports(self.changes) {
            return Err(ConfigError::UnsupportedChanges);
        }
        self.precision.validate()
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self::for_variant(FeedVariant::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_precision() {
        let table = PrecisionTable::classic();
        assert_eq!(table.format(12345.6), "$12345.6");
        assert_eq!(table.format(1234.5), "$1234.5");
        assert_eq!(table.format(42.567), "$42.57");
        assert_eq!(table.format(0.012345), "$0.0123");
    }

    #[test]
    fn test_compact_precision() {
        let table = PrecisionTable::compact();
        assert_eq!(table.format(12345.6), "$12346");
        assert_eq!(table.format(1234.5), "$1234.5");
        assert_eq!(table.format(42.567), "$42.57");
        assert_eq!(table.format(0.012345), "$0.0123");
    }

    #[test]
    fn test_extended_precision() {
        let table = PrecisionTable::extended();
        assert_eq!(table.format(12345.6), "$12346");
        assert_eq!(table.format(1234.5), "$1234.50");
        assert_eq!(table.format(42.567), "$42.567");
        assert_eq!(table.decimals_for(0.012345), 5);
        let small = table.format(0.012345);
        assert!(small.starts_with("$0.0123"));
        assert_eq!(small.len(), "$0.01234".len());
    }

    #[test]
    fn test_bucket_edges_are_strict() {
        let table = PrecisionTable::compact();
        assert_eq!(table.decimals_for(9999.0), 1);
        assert_eq!(table.decimals_for(999.0), 2);
        assert_eq!(table.decimals_for(9.0), 4);
        assert_eq!(table.decimals_for(0.0), 4);
    }

    #[test]
    fn test_variant_configs() {
        let simple = TickerConfig::for_variant(FeedVariant::Simple);
        assert_eq!(simple.shape, ResponseShape::SimplePrice);
        assert_eq!(simple.changes, ChangeFields::None);
        assert_eq!(simple, TickerConfig::default());

        let day = TickerConfig::for_variant(FeedVariant::Simple24h);
        assert_eq!(day.changes, ChangeFields::Day);
        assert_eq!(day.precision, PrecisionTable::compact());

        let markets = TickerConfig::for_variant(FeedVariant::Markets);
        assert_eq!(markets.shape, ResponseShape::Markets);
        assert_eq!(markets.changes.windows().len(), 3);
        assert_eq!(markets.rotation_interval_ms, 4_000);
        assert_eq!(markets.refresh_interval_ms, 60_000);
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!("markets".parse::<FeedVariant>(), Ok(FeedVariant::Markets));
        assert_eq!(" Simple24H ".parse::<FeedVariant>(), Ok(FeedVariant::Simple24h));
        assert_eq!(
            "bogus".parse::<FeedVariant>(),
            Err(ConfigError::UnknownVariant("bogus".to_string()))
        );
    }

    #[test]
    fn test_validate() {
        assert_eq!(TickerConfig::default().validate(), Ok(()));

        let config = TickerConfig {
            refresh_interval_ms: 0,
            ..TickerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroInterval("refresh_interval_ms"))
        );

        let config = TickerConfig {
            precision: PrecisionTable {
                buckets: vec![
                    PrecisionBucket { above: 9.0, decimals: 2 },
                    PrecisionBucket { above: 999.0, decimals: 1 },
                ],
                fallback_decimals: 4,
            },
            ..TickerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::UnsortedBuckets));

        let config = TickerConfig {
            changes: ChangeFields::HourDayWeek,
            ..TickerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::UnsupportedChanges));
    }

    #[test]
    fn test_config_from_json_uses_defaults() {
        let config: TickerConfig =
            serde_json::from_str(r#"{ "shape": "markets", "changes": "hour_day_week" }"#).unwrap();

        assert_eq!(config.shape, ResponseShape::Markets);
        assert_eq!(config.changes, ChangeFields::HourDayWeek);
        assert_eq!(config.rotation_interval_ms, 4_000);
        assert_eq!(config.precision, PrecisionTable::classic());
    }
}
