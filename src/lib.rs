//! # Coin Ticker
//!
//! Core of a small rotating cryptocurrency price display: a scheduler that
//! cycles through a fixed set of coins and periodically refreshes their
//! prices from CoinGecko.
//!
//! ## Architecture
//!
//! ```text
//! Scheduler::run()  (single cooperative loop)
//!     ├─ every 4s  → next coin → DisplaySink::render(RenderPayload)
//!     └─ every 60s → PriceFetcher::refresh()
//!                       ↓ Connectivity (bounded reconnect)
//!                       ↓ HttpTransport (GET, explicit timeout)
//!                       ↓ ResponseShape::parse (candidate table)
//!                       ↓ PriceTable::commit (all or nothing)
//! ```
//!
//! The network link, the HTTP client, the clock and the screen are all
//! traits, so the whole pipeline runs against a virtual clock in tests.
//!
//! ## Usage
//!
//! ```no_run
//! use coin_ticker::{
//!     clock::SystemClock, connectivity::HostNetwork, display::ConsoleDisplay,
//!     transport::ReqwestTransport, CoinSet, FeedVariant, PriceFetcher, Scheduler, TickerConfig,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TickerConfig::for_variant(FeedVariant::Simple24h);
//! let transport = ReqwestTransport::from_config(&config)?;
//! let fetcher = PriceFetcher::new(
//!     config,
//!     CoinSet::default(),
//!     Arc::new(transport),
//!     Arc::new(HostNetwork),
//!     Arc::new(SystemClock::new()),
//! )?;
//!
//! Scheduler::new(fetcher, ConsoleDisplay).run().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Refresh failures ([`FetchError`]) are logged and the last known prices
//! stay on screen until the next refresh interval. The only fatal error is a
//! display that fails to initialize ([`DisplayError::InitFailed`]).

pub mod clock;
pub mod config;
pub mod connectivity;
pub mod constants;
pub mod display;
pub mod error;
pub mod feeds;
pub mod fetcher;
pub mod metrics;
pub mod scheduler;
pub mod store;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use config::{FeedVariant, PrecisionTable, ResponseShape, TickerConfig};
pub use error::{ConfigError, DisplayError, FetchError};
pub use fetcher::PriceFetcher;
pub use metrics::RefreshMetrics;
pub use scheduler::{Scheduler, TickReport};
pub use store::PriceTable;
pub use types::{
    ChangeFields, ChangeWindow, Coin, CoinSet, IconRef, LabeledChange, PriceSnapshot,
    RefreshState, RenderPayload, RotationState,
};
