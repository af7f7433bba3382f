//! Rotation and refresh scheduler
//!
//! ```text
//! Scheduler::run()
//!     ↓ (poll)
//! tick(now) ── rotation due? ──→ advance index ──→ DisplaySink::render
//!           └─ refresh due?  ──→ PriceFetcher::refresh ──→ PriceTable::commit
//! ```
//!
//! Both timers are anchored to the `now` passed to the tick that fired them,
//! so a long refresh delays the next rotation but never makes a timer fire
//! twice in a row.

use crate::{
    clock::{Clock, Millis},
    constants::CONNECTING_MESSAGE,
    display::{render_payload, DisplaySink},
    error::{DisplayError, FetchError},
    fetcher::PriceFetcher,
    types::{RefreshState, RotationState},
};
use std::sync::Arc;

/// What a single [`Scheduler::tick`] did
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickReport {
    /// The display moved to the next coin
    pub rotated: bool,
    /// Outcome of the refresh, if one was due
    pub refreshed: Option<Result<(), FetchError>>,
}

/// Drives the display rotation and price refresh from one cooperative loop
pub struct Scheduler<D> {
    fetcher: PriceFetcher,
    display: D,
    clock: Arc<dyn Clock>,
    rotation: RotationState,
    refresh: RefreshState,
}

impl<D: DisplaySink> Scheduler<D> {
    /// Creates a scheduler on the fetcher's clock
    pub fn new(fetcher: PriceFetcher, display: D) -> Self {
        let clock = fetcher.clock().clone();
        Self {
            fetcher,
            display,
            clock,
            rotation: RotationState::default(),
            refresh: RefreshState::default(),
        }
    }

    /// Boot sequence: bring up the display, do a first fetch, show coin 0
    ///
    /// A display that fails to initialize is the one fatal error. A failed
    /// first fetch is not; the ticker starts on default prices and retries
    /// at the next refresh interval.
    pub async fn start(&mut self) -> Result<(), DisplayError> {
        self.display.init()?;

        if let Err(e) = self.display.show_status(CONNECTING_MESSAGE) {
            tracing::warn!(error = %e, "Failed to show status");
        }

        let outcome = self.fetcher.refresh().await;
        self.refresh.last_succeeded = Some(outcome.is_ok());

        self.rotation.current_index = 0;
        self.render_current().await;

        let now = self.clock.now();
        self.rotation.last_rotation = now;
        self.refresh.last_refresh = now;

        tracing::info!(
            coins = self.fetcher.coins().len(),
            rotation_interval_ms = self.fetcher.config().rotation_interval_ms,
            refresh_interval_ms = self.fetcher.config().refresh_interval_ms,
            "Ticker started"
        );
        Ok(())
    }

    /// Runs [`Scheduler::start`] and then polls [`Scheduler::tick`] forever
    pub async fn run(&mut self) -> Result<(), DisplayError> {
        self.start().await?;

        let idle_ms = self.fetcher.config().idle_poll_ms;
        loop {
            let now = self.clock.now();
            self.tick(now).await;
            self.clock.sleep(idle_ms).await;
        }
    }

    /// Fires whichever timers are due at `now`, rotation first
    pub async fn tick(&mut self, now: Millis) -> TickReport {
        let mut report = TickReport::default();
        let config = self.fetcher.config();
        let rotation_interval_ms = config.rotation_interval_ms;
        let refresh_interval_ms = config.refresh_interval_ms;

        if now.wrapping_since(self.rotation.last_rotation) > rotation_interval_ms {
            let len = self.fetcher.coins().len();
            self.rotation.current_index = (self.rotation.current_index + 1) % len;
            self.render_current().await;
            self.rotation.last_rotation = now;
            report.rotated = true;
        }

        if now.wrapping_since(self.refresh.last_refresh) > refresh_interval_ms {
            let outcome = self.fetcher.refresh().await;
            self.refresh.last_succeeded = Some(outcome.is_ok());
            self.refresh.last_refresh = now;
            report.refreshed = Some(outcome);
        }

        report
    }

    async fn render_current(&mut self) {
        let index = self.rotation.current_index;
        let snapshot = self.fetcher.table().get(index).await.unwrap_or_default();
        let config = self.fetcher.config();

        let Some(payload) = render_payload(
            self.fetcher.coins(),
            index,
            &snapshot,
            config.changes,
            &config.precision,
        ) else {
            return;
        };

        if let Err(e) = self.display.render(&payload) {
            tracing::warn!(error = %e, symbol = payload.symbol, "Failed to render coin");
        }
    }

    /// Index of the coin on screen
    pub fn current_index(&self) -> usize {
        self.rotation.current_index
    }

    pub fn rotation_state(&self) -> RotationState {
        self.rotation
    }

    pub fn refresh_state(&self) -> RefreshState {
        self.refresh
    }

    pub fn fetcher(&self) -> &PriceFetcher {
        &self.fetcher
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::mock::ManualClock,
        config::{FeedVariant, TickerConfig},
        connectivity::mock::MockConnectivity,
        display::mock::RecordingDisplay,
        transport::mock::MockTransport,
        types::CoinSet,
    };
    use std::time::Duration;

    const FIXTURE: &str = r#"{
        "bitcoin": { "usd": 50000, "usd_24h_change": 2.5 },
        "ethereum": { "usd": 3000, "usd_24h_change": -1.0 },
        "dogecoin": { "usd": 0.08, "usd_24h_change": 4.0 },
        "ravencoin": { "usd": 0.02, "usd_24h_change": -6.0 }
    }"#;

    const UPDATED_FIXTURE: &str = r#"{
        "bitcoin": { "usd": 52000, "usd_24h_change": 3.5 },
        "ethereum": { "usd": 3100, "usd_24h_change": 0.5 },
        "dogecoin": { "usd": 0.09, "usd_24h_change": 5.0 },
        "ravencoin": { "usd": 0.025, "usd_24h_change": 1.0 }
    }"#;

    struct Harness {
        scheduler: Scheduler<RecordingDisplay>,
        transport: MockTransport,
        link: Arc<MockConnectivity>,
        clock: Arc<ManualClock>,
    }

    fn harness_with(config: TickerConfig, display: RecordingDisplay) -> Harness {
        let transport = MockTransport::new();
        let link = Arc::new(MockConnectivity::online());
        let clock = Arc::new(ManualClock::new(0));
        let fetcher = PriceFetcher::new(
            config,
            CoinSet::default(),
            Arc::new(transport.clone()),
            link.clone(),
            clock.clone(),
        )
        .unwrap();

        Harness {
            scheduler: Scheduler::new(fetcher, display),
            transport,
            link,
            clock,
        }
    }

    fn harness(variant: FeedVariant) -> Harness {
        harness_with(TickerConfig::for_variant(variant), RecordingDisplay::new())
    }

    #[tokio::test]
    async fn test_start_fetches_and_shows_first_coin() {
        let mut h = harness(FeedVariant::Simple);
        h.transport.push_ok(FIXTURE);

        h.scheduler.start().await.unwrap();

        let display = h.scheduler.display();
        assert_eq!(display.statuses, vec!["Connecting...".to_string()]);
        assert_eq!(display.rendered_indices(), vec![0]);
        assert_eq!(display.last_frame().unwrap().price_text, "$50000.0");
        assert_eq!(h.scheduler.refresh_state().last_succeeded, Some(true));
    }

    #[tokio::test]
    async fn test_start_fails_when_display_is_missing() {
        let mut h = harness_with(TickerConfig::default(), RecordingDisplay::broken());
        h.transport.push_ok(FIXTURE);

        let result = h.scheduler.start().await;

        assert!(matches!(result, Err(DisplayError::InitFailed(_))));
        assert_eq!(h.transport.call_count(), 0);
        assert!(h.scheduler.display().frames.is_empty());
    }

    #[tokio::test]
    async fn test_start_survives_failed_first_fetch() {
        let mut h = harness(FeedVariant::Simple);
        h.transport.push_status(503);

        h.scheduler.start().await.unwrap();

        let frame = h.scheduler.display().last_frame().unwrap();
        assert_eq!(frame.symbol, "BTC");
        assert_eq!(frame.price_text, "$0.0000");
        assert_eq!(h.scheduler.refresh_state().last_succeeded, Some(false));
    }

    #[tokio::test]
    async fn test_end_to_end_rotation() {
        let mut h = harness(FeedVariant::Simple);
        h.transport.push_ok(FIXTURE);
        h.scheduler.start().await.unwrap();

        assert_eq!(h.scheduler.current_index(), 0);

        let report = h.scheduler.tick(Millis(4_001)).await;

        assert!(report.rotated);
        assert_eq!(report.refreshed, None);
        assert_eq!(h.scheduler.current_index(), 1);
        let frame = h.scheduler.display().last_frame().unwrap();
        assert_eq!(frame.symbol, "ETH");
        assert_eq!(frame.price_text, "$3000.0");
    }

    #[tokio::test]
    async fn test_end_to_end_compact_variant() {
        let mut h = harness(FeedVariant::Simple24h);
        h.transport.push_ok(FIXTURE);
        h.scheduler.start().await.unwrap();

        let frame = h.scheduler.display().last_frame().unwrap();
        assert_eq!(frame.price_text, "$50000");
        assert_eq!(frame.changes.len(), 1);
        assert_eq!(frame.changes[0].to_string(), "24h +2.50%");
    }

    #[tokio::test]
    async fn test_rotation_interval_is_strict() {
        let mut h = harness(FeedVariant::Simple);
        h.transport.push_ok(FIXTURE);
        h.scheduler.start().await.unwrap();

        assert!(!h.scheduler.tick(Millis(4_000)).await.rotated);
        assert_eq!(h.scheduler.current_index(), 0);
        assert!(h.scheduler.tick(Millis(4_001)).await.rotated);
        assert_eq!(h.scheduler.current_index(), 1);
    }

    #[tokio::test]
    async fn test_overdue_rotation_advances_once() {
        let mut h = harness(FeedVariant::Simple);
        h.transport.push_ok(FIXTURE);
        h.scheduler.start().await.unwrap();

        // Many intervals have passed since the last tick.
        let report = h.scheduler.tick(Millis(4_001 * 7)).await;

        assert!(report.rotated);
        assert_eq!(h.scheduler.current_index(), 1);
        assert_eq!(
            h.scheduler.rotation_state().last_rotation,
            Millis(4_001 * 7)
        );
        assert!(!h.scheduler.tick(Millis(4_001 * 7 + 1)).await.rotated);
    }

    #[tokio::test]
    async fn test_index_wraps() {
        let mut h = harness(FeedVariant::Simple);
        h.transport.push_ok(FIXTURE);
        h.scheduler.start().await.unwrap();

        for step in 1..=5u32 {
            h.scheduler.tick(Millis(step * 4_001)).await;
        }

        assert_eq!(h.scheduler.display().rendered_indices(), vec![0, 1, 2, 3, 0, 1]);
        assert_eq!(h.scheduler.current_index(), 1);
    }

    #[tokio::test]
    async fn test_refresh_fires_after_interval() {
        let mut h = harness(FeedVariant::Simple);
        h.transport.push_ok(FIXTURE);
        h.transport.push_ok(UPDATED_FIXTURE);
        h.scheduler.start().await.unwrap();

        assert_eq!(h.scheduler.tick(Millis(60_000)).await.refreshed, None);
        assert_eq!(h.transport.call_count(), 1);

        let report = h.scheduler.tick(Millis(60_001)).await;

        assert_eq!(report.refreshed, Some(Ok(())));
        assert_eq!(h.transport.call_count(), 2);
        let btc = h.scheduler.fetcher().table().get(0).await.unwrap();
        assert_eq!(btc.price_usd, 52000.0);
    }

    #[tokio::test]
    async fn test_rotation_renders_before_refresh() {
        let mut h = harness(FeedVariant::Simple);
        h.transport.push_ok(FIXTURE);
        h.transport.push_ok(UPDATED_FIXTURE);
        h.scheduler.start().await.unwrap();

        let report = h.scheduler.tick(Millis(60_001)).await;

        assert!(report.rotated);
        assert_eq!(report.refreshed, Some(Ok(())));
        // ETH was drawn from the table as it stood before this refresh.
        assert_eq!(h.scheduler.display().last_frame().unwrap().price_usd, 3000.0);

        h.scheduler.tick(Millis(64_002)).await;
        assert_eq!(h.scheduler.display().last_frame().unwrap().price_usd, 0.09);
    }

    #[tokio::test]
    async fn test_failed_refresh_still_resets_timer() {
        let mut h = harness(FeedVariant::Simple);
        h.transport.push_ok(FIXTURE);
        h.transport.push_status(500);
        h.scheduler.start().await.unwrap();

        let report = h.scheduler.tick(Millis(60_001)).await;

        assert_eq!(report.refreshed, Some(Err(FetchError::Http(500))));
        let state = h.scheduler.refresh_state();
        assert_eq!(state.last_refresh, Millis(60_001));
        assert_eq!(state.last_succeeded, Some(false));

        // No retry before the next interval.
        assert_eq!(h.scheduler.tick(Millis(100_000)).await.refreshed, None);
        assert_eq!(h.transport.call_count(), 2);
        assert!(h.scheduler.tick(Millis(120_002)).await.refreshed.is_some());

        // Stale prices stay on screen.
        let btc = h.scheduler.fetcher().table().get(0).await.unwrap();
        assert_eq!(btc.price_usd, 50000.0);
    }

    #[tokio::test]
    async fn test_disconnected_refresh_is_bounded() {
        let mut h = harness(FeedVariant::Simple);
        h.transport.push_ok(FIXTURE);
        h.scheduler.start().await.unwrap();
        h.link.set_connected(false);

        h.clock.set(60_001);
        let report = h.scheduler.tick(Millis(60_001)).await;

        assert_eq!(report.refreshed, Some(Err(FetchError::Disconnected)));
        assert_eq!(h.clock.now(), Millis(70_001));
        // Timer is anchored to the tick, not to when the refresh returned.
        assert_eq!(h.scheduler.refresh_state().last_refresh, Millis(60_001));
    }

    #[tokio::test]
    async fn test_render_failure_does_not_stop_rotation() {
        let mut h = harness_with(
            TickerConfig::for_variant(FeedVariant::Simple),
            RecordingDisplay::flaky(),
        );
        h.transport.push_ok(FIXTURE);

        h.scheduler.start().await.unwrap();
        assert!(h.scheduler.tick(Millis(4_001)).await.rotated);
        assert!(h.scheduler.tick(Millis(8_002)).await.rotated);

        assert_eq!(h.scheduler.current_index(), 2);
        assert_eq!(h.scheduler.display().rendered_indices(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_scheduler_runs_on_fetcher_clock() {
        let mut h = harness(FeedVariant::Simple);
        h.transport.push_ok(FIXTURE);
        h.clock.set(50_000);

        h.scheduler.start().await.unwrap();

        assert_eq!(h.scheduler.rotation_state().last_rotation, Millis(50_000));
        assert_eq!(h.scheduler.refresh_state().last_refresh, Millis(50_000));
        assert!(!h.scheduler.tick(Millis(54_000)).await.rotated);
        assert!(h.scheduler.tick(Millis(54_001)).await.rotated);
    }

    #[tokio::test]
    async fn test_timers_across_clock_rollover() {
        let mut h = harness(FeedVariant::Simple);
        h.transport.push_ok(FIXTURE);
        h.clock.set(u32::MAX - 1_000);
        h.scheduler.start().await.unwrap();

        let before_wrap = Millis(u32::MAX);
        assert!(!h.scheduler.tick(before_wrap).await.rotated);

        let after_wrap = Millis(u32::MAX - 1_000).wrapping_add(4_001);
        assert_eq!(after_wrap, Millis(3_000));
        assert!(h.scheduler.tick(after_wrap).await.rotated);
        assert_eq!(h.scheduler.current_index(), 1);
    }

    #[tokio::test]
    async fn test_run_rotates_on_virtual_clock() {
        let mut h = harness(FeedVariant::Simple);
        h.transport.push_ok(FIXTURE);

        let result = tokio::time::timeout(Duration::from_millis(200), h.scheduler.run()).await;

        assert!(result.is_err(), "run only returns on display failure");
        assert!(h.scheduler.display().frames.len() >= 2);
        assert!(h.clock.now().0 > 4_000);
    }
}
