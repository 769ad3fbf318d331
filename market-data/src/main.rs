use dotenvy::dotenv;
use market_data::config::MarketDataConfig;
use market_data::updater::MarketDataUpdater;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let otlp_endpoint = std::env::var("OTLP_ENDPOINT").ok();
    init_tracing("market-data", "info", otlp_endpoint.as_deref());

    let config = MarketDataConfig::from_env().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    let updater = MarketDataUpdater::new(config)?;
    updater.run().await?;

    Ok(())
}
