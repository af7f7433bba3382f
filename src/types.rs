//! Types for the coin ticker

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Name of a bitmap asset the display sink knows how to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct IconRef(pub &'static str);

/// A tracked cryptocurrency and its display metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Coin {
    /// Ticker symbol shown on screen
    pub symbol: &'static str,
    /// Identifier used by the price feed (CoinGecko id)
    pub feed_id: &'static str,
    /// Icon drawn next to the symbol
    pub icon: IconRef,
}

impl Coin {
    pub const fn new(symbol: &'static str, feed_id: &'static str, icon: IconRef) -> Self {
        Self {
            symbol,
            feed_id,
            icon,
        }
    }
}

/// Ordered, immutable list of coins shown by the ticker
///
/// Cheap to clone; every clone shares the same backing slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinSet {
    coins: Arc<[Coin]>,
}

impl CoinSet {
    /// Creates a coin set, rejecting an empty list
    pub fn new(coins: impl Into<Arc<[Coin]>>) -> Result<Self, ConfigError> {
        let coins = coins.into();
        if coins.is_empty() {
            return Err(ConfigError::EmptyCoinSet);
        }
        Ok(Self { coins })
    }

    /// Number of coins (N)
    pub fn len(&self) -> usize {
        self.coins.len()
    }

    /// Always false, a coin set is never empty
    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Coin> {
        self.coins.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coin> {
        self.coins.iter()
    }

    /// Feed ids joined with commas, in display order
    pub fn feed_ids(&self) -> String {
        self.coins
            .iter()
            .map(|c| c.feed_id)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Position of the coin with the given feed id
    pub fn position_of(&self, feed_id: &str) -> Option<usize> {
        self.coins.iter().position(|c| c.feed_id == feed_id)
    }
}

impl Default for CoinSet {
    fn default() -> Self {
        Self {
            coins: Arc::from(crate::constants::DEFAULT_COINS),
        }
    }
}

/// Time window of a percentage change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeWindow {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "24h")]
    OneDay,
    #[serde(rename = "7d")]
    SevenDays,
}

impl ChangeWindow {
    /// Label shown next to the percentage
    pub fn label(&self) -> &'static str {
        match self {
            ChangeWindow::OneHour => "1h",
            ChangeWindow::OneDay => "24h",
            ChangeWindow::SevenDays => "7d",
        }
    }
}

/// Which percentage-change fields the feed is asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeFields {
    /// Price only
    #[default]
    None,
    /// 24h change
    Day,
    /// 1h, 24h and 7d changes
    HourDayWeek,
}

impl ChangeFields {
    /// Windows to fetch and display, in display order
    pub fn windows(&self) -> &'static [ChangeWindow] {
        match self {
            ChangeFields::None => &[],
            ChangeFields::Day => &[ChangeWindow::OneDay],
            ChangeFields::HourDayWeek => &[
                ChangeWindow::OneHour,
                ChangeWindow::OneDay,
                ChangeWindow::SevenDays,
            ],
        }
    }
}

/// Current price and percentage changes for one coin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceSnapshot {
    /// Price in USD
    pub price_usd: f64,
    pub change_1h: Option<f64>,
    pub change_24h: Option<f64>,
    pub change_7d: Option<f64>,
}

impl PriceSnapshot {
    /// Create a snapshot with only a price
    pub fn new(price_usd: f64) -> Self {
        Self {
            price_usd,
            ..Self::default()
        }
    }

    /// Set the change for one window
    pub fn with_change(mut self, window: ChangeWindow, percent: f64) -> Self {
        match window {
            ChangeWindow::OneHour => self.change_1h = Some(percent),
            ChangeWindow::OneDay => self.change_24h = Some(percent),
            ChangeWindow::SevenDays => self.change_7d = Some(percent),
        }
        self
    }

    pub fn change(&self, window: ChangeWindow) -> Option<f64> {
        match window {
            ChangeWindow::OneHour => self.change_1h,
            ChangeWindow::OneDay => self.change_24h,
            ChangeWindow::SevenDays => self.change_7d,
        }
    }
}

/// A percentage change with its window label
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabeledChange {
    pub label: &'static str,
    pub percent: f64,
}

impl fmt::Display for LabeledChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:+.2}%", self.label, self.percent)
    }
}

/// Everything the display sink needs to draw one coin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPayload {
    /// Position in the coin set
    pub index: usize,
    pub symbol: &'static str,
    pub icon: IconRef,
    /// Raw price in USD
    pub price_usd: f64,
    /// Price formatted with the configured precision, e.g. `$3000.00`
    pub price_text: String,
    /// Zero to three changes, in display order
    pub changes: Vec<LabeledChange>,
}

/// Observable state of the refresh timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshState {
    /// When the last refresh was attempted
    pub last_refresh: crate::clock::Millis,
    /// Outcome of the last attempt; `None` before the first one
    pub last_succeeded: Option<bool>,
}

/// State of the display rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RotationState {
    /// Coin currently on screen
    pub current_index: usize,
    /// When the coin on screen last changed
    pub last_rotation: crate::clock::Millis,
}
