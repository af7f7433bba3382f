//! Constants for the coin ticker
//!
//! Compile-time defaults for every knob in [`TickerConfig`](crate::config::TickerConfig).
//! The coin list itself is fixed here and never changes at runtime.

use crate::types::{Coin, IconRef};

/// Time between display rotations (in milliseconds)
pub const ROTATION_INTERVAL_MS: u32 = 4_000;

/// Time between price refreshes (in milliseconds)
pub const REFRESH_INTERVAL_MS: u32 = 60_000;

/// How long to wait for the network to come back before giving up on a refresh
pub const RECONNECT_WINDOW_MS: u32 = 10_000;

/// How often to poll connectivity while reconnecting
pub const RECONNECT_POLL_MS: u32 = 500;

/// Sleep between scheduler polls in [`Scheduler::run`](crate::scheduler::Scheduler::run)
pub const IDLE_POLL_MS: u32 = 10;

/// HTTP request timeout when fetching prices (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko endpoint returning a flat `{ id: { usd: .. } }` map
pub const COINGECKO_SIMPLE_PRICE_ENDPOINT: &str = "/simple/price";

/// CoinGecko endpoint returning an array of market objects
pub const COINGECKO_MARKETS_ENDPOINT: &str = "/coins/markets";

/// User agent for HTTP requests
pub const USER_AGENT: &str = "coin-ticker/0.1.0";

/// Status line shown while the first connect and fetch run
pub const CONNECTING_MESSAGE: &str = "Connecting...";

/// Coins shown on the ticker, in display order
pub const DEFAULT_COINS: &[Coin] = &[
    Coin::new("BTC", "bitcoin", IconRef("btc_logo")),
    Coin::new("ETH", "ethereum", IconRef("eth_logo")),
    Coin::new("DOGE", "dogecoin", IconRef("doge_logo")),
    Coin::new("RVN", "ravencoin", IconRef("rvn_logo")),
];
