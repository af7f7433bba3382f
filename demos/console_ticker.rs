use coin_ticker::{
    clock::SystemClock, connectivity::HostNetwork, display::ConsoleDisplay,
    transport::ReqwestTransport, CoinSet, FeedVariant, PriceFetcher, Scheduler, TickerConfig,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=info shows refresh results; tracing forwards to `log` here.
    env_logger::init();

    // TICKER_VARIANT selects the feed: simple (default), simple24h or markets.
    let variant: FeedVariant = match std::env::var("TICKER_VARIANT") {
        Ok(name) => name.parse()?,
        Err(_) => FeedVariant::default(),
    };
    let config = TickerConfig::for_variant(variant);

    println!("Coin ticker ({} feed)", variant.name());
    println!("-------------------------------------------");

    let transport = ReqwestTransport::from_config(&config)?;
    let fetcher = PriceFetcher::new(
        config,
        CoinSet::default(),
        Arc::new(transport),
        Arc::new(HostNetwork),
        Arc::new(SystemClock::new()),
    )?;

    let mut scheduler = Scheduler::new(fetcher, ConsoleDisplay);
    scheduler.run().await?;

    Ok(())
}
