//! Price fetcher
//!
//! Owns the fetch-parse-store pipeline: makes sure the network is up, pulls
//! the feed once, parses it into a candidate table and commits it whole.

use crate::{
    clock::Clock,
    config::TickerConfig,
    connectivity::{ensure_connected, Connectivity},
    error::{ConfigError, FetchError},
    metrics::{MetricsCollector, RefreshMetrics},
    store::PriceTable,
    transport::HttpTransport,
    types::CoinSet,
};
use std::sync::Arc;

/// Keeps a [`PriceTable`] in line with the price feed
///
/// # Example
/// ```no_run
/// use coin_ticker::{
///     clock::SystemClock, connectivity::HostNetwork, transport::ReqwestTransport,
///     CoinSet, PriceFetcher, TickerConfig,
/// };
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = PriceFetcher::new(
///     TickerConfig::default(),
///     CoinSet::default(),
///     Arc::new(ReqwestTransport::new()?),
///     Arc::new(HostNetwork),
///     Arc::new(SystemClock::new()),
/// )?;
/// fetcher.refresh().await?;
/// println!("BTC: ${:.2}", fetcher.table().get(0).await.unwrap_or_default().price_usd);
/// # Ok(())
/// # }
/// ```
pub struct PriceFetcher {
    config: TickerConfig,
    coins: CoinSet,
    url: String,
    table: Arc<PriceTable>,
    transport: Arc<dyn HttpTransport>,
    connectivity: Arc<dyn Connectivity>,
    clock: Arc<dyn Clock>,
    metrics: Arc<MetricsCollector>,
}

impl PriceFetcher {
    /// Creates a fetcher with an empty table
    ///
    /// Fails if `config` does not validate.
    pub fn new(
        config: TickerConfig,
        coins: CoinSet,
        transport: Arc<dyn HttpTransport>,
        connectivity: Arc<dyn Connectivity>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let url = config
            .shape
            .build_url(&config.api_base_url, &coins, config.changes);
        let table = Arc::new(PriceTable::new(coins.len()));

        Ok(Self {
            config,
            coins,
            url,
            table,
            transport,
            connectivity,
            clock,
            metrics: Arc::new(MetricsCollector::new()),
        })
    }

    /// Fetches fresh prices and replaces the table
    ///
    /// On any error the table keeps its previous contents. The error is
    /// logged here; callers only need it for bookkeeping.
    pub async fn refresh(&self) -> Result<(), FetchError> {
        let started = self.clock.now();
        let result = self.fetch_and_commit().await;
        let elapsed_ms = self.clock.now().wrapping_since(started);

        self.metrics
            .record_refresh(elapsed_ms, result.as_ref().map(|_| ()))
            .await;

        match &result {
            Ok(()) => tracing::info!(
                coins = self.coins.len(),
                transport = self.transport.transport_name(),
                latency_ms = elapsed_ms,
                "Prices updated"
            ),
            Err(e) => tracing::warn!(
                error = %e,
                kind = e.kind(),
                latency_ms = elapsed_ms,
                "Failed to fetch prices, keeping last known values"
            ),
        }

        result
    }

    async fn fetch_and_commit(&self) -> Result<(), FetchError> {
        ensure_connected(
            self.connectivity.as_ref(),
            self.clock.as_ref(),
            self.config.reconnect_window_ms,
            self.config.reconnect_poll_ms,
        )
        .await?;

        tracing::debug!(url = %self.url, "Fetching prices");
        let response = self.transport.get(&self.url).await?;

        if response.status != 200 {
            return Err(FetchError::Http(response.status));
        }

        let candidate = self
            .config
            .shape
            .parse(&response.body, &self.coins, self.config.changes)?;

        self.table.commit(candidate).await
    }

    /// Shared handle to the price table
    pub fn table(&self) -> &Arc<PriceTable> {
        &self.table
    }

    pub fn coins(&self) -> &CoinSet {
        &self.coins
    }

    pub fn config(&self) -> &TickerConfig {
        &self.config
    }

    /// Clock used for reconnect waits and latency; the scheduler runs on it too
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// URL requested on every refresh
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Latency percentiles, success rate and failure counts
    pub async fn metrics(&self) -> RefreshMetrics {
        self.metrics.get_metrics().await
    }
}
