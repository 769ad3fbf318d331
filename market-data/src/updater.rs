use crate::coingecko::CoinGeckoClient;
use crate::config::MarketDataConfig;
use crate::error::Result;
use crate::store;
use chrono::NaiveDate;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryOutcome {
    /// Rows for previously unseen dates were appended.
    Added(usize),
    /// Every fetched date was already on file.
    UpToDate,
    /// The API returned no price points.
    NoData,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LatestOutcome {
    Updated(NaiveDate),
    NoData,
}

pub struct MarketDataUpdater {
    client: CoinGeckoClient,
    config: MarketDataConfig,
}

impl MarketDataUpdater {
    pub fn new(config: MarketDataConfig) -> Result<Self> {
        let client = CoinGeckoClient::new(config.clone())?;
        Ok(Self { client, config })
    }

    /// Backfills days from the look-back window that are missing locally.
    pub async fn update_history(&self) -> Result<HistoryOutcome> {
        let fetched = self.client.fetch_history().await?;
        if fetched.is_empty() {
            warn!("No historical data returned");
            return Ok(HistoryOutcome::NoData);
        }

        let mut records = store::read_records(&self.config.csv_path)?;
        let added = store::merge_new_days(&mut records, fetched);
        if added == 0 {
            info!("No new historical daily records");
            return Ok(HistoryOutcome::UpToDate);
        }

        store::write_records(&self.config.csv_path, &mut records)?;
        info!(
            "Added {} historical daily records to {}",
            added,
            self.config.csv_path.display()
        );
        Ok(HistoryOutcome::Added(added))
    }

    /// Replaces the row for the snapshot's day with the latest values.
    pub async fn update_latest(&self) -> Result<LatestOutcome> {
        let Some(latest) = self.client.fetch_latest().await? else {
            warn!("No latest market data returned");
            return Ok(LatestOutcome::NoData);
        };

        let day = latest.date();
        let mut records = store::read_records(&self.config.csv_path)?;
        store::replace_day(&mut records, latest);
        store::write_records(&self.config.csv_path, &mut records)?;

        info!("Updated {} with latest data for {}", self.config.csv_path.display(), day);
        Ok(LatestOutcome::Updated(day))
    }

    /// Runs the history backfill, then the latest refresh.
    ///
    /// A failing step is logged and does not stop the other one. The
    /// first error is returned once both have run.
    pub async fn run(&self) -> Result<()> {
        let history = self.update_history().await;
        if let Err(e) = &history {
            error!("Historical update failed: {}", e);
        }

        let latest = self.update_latest().await;
        if let Err(e) = &latest {
            error!("Latest update failed: {}", e);
        }

        history?;
        latest?;
        Ok(())
    }
}
