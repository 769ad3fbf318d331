use crate::config::MarketDataConfig;
use crate::error::{MarketDataError, Result};
use crate::store::MarketRecord;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// `[unix_millis, value]` pairs as returned by `market_chart`.
type Series = Vec<(f64, Option<f64>)>;

#[derive(Debug, Deserialize)]
struct MarketChart {
    #[serde(default)]
    prices: Series,
    #[serde(default)]
    market_caps: Series,
    #[serde(default)]
    total_volumes: Series,
}

#[derive(Debug, Deserialize)]
struct CoinMarket {
    last_updated: String,
    current_price: Option<f64>,
    market_cap: Option<f64>,
    total_volume: Option<f64>,
}

#[derive(Clone)]
pub struct CoinGeckoClient {
    client: Client,
    config: MarketDataConfig,
}

impl CoinGeckoClient {
    pub fn new(config: MarketDataConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Daily points for the configured look-back window.
    ///
    /// Only timestamps present in all three series are kept.
    pub async fn fetch_history(&self) -> Result<Vec<MarketRecord>> {
        let url = format!(
            "{}/coins/{}/market_chart",
            self.config.api_base_url, self.config.coin_id
        );
        let days = self.config.history_days.to_string();

        debug!("Fetching {} day history from {}", days, url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("vs_currency", self.config.vs_currency.as_str()),
                ("days", days.as_str()),
                ("interval", "daily"),
            ])
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let text = check_status(response).await?;
        let chart: MarketChart = serde_json::from_str(&text)?;
        let records = join_series(chart)?;

        info!("[COINGECKO] {} historical points", records.len());
        Ok(records)
    }

    /// Current snapshot, or `None` when the API lists no market.
    pub async fn fetch_latest(&self) -> Result<Option<MarketRecord>> {
        let url = format!("{}/coins/markets", self.config.api_base_url);

        debug!("Fetching latest market data from {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("vs_currency", self.config.vs_currency.as_str()),
                ("ids", self.config.coin_id.as_str()),
            ])
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let text = check_status(response).await?;
        let markets: Vec<CoinMarket> = serde_json::from_str(&text)?;

        let Some(market) = markets.into_iter().next() else {
            return Ok(None);
        };

        let snapped_at = DateTime::parse_from_rfc3339(&market.last_updated)
            .map_err(|_| MarketDataError::InvalidData {
                message: format!("Invalid last_updated: {}", market.last_updated),
            })?
            .with_timezone(&Utc);

        if let Some(price) = market.current_price {
            info!("[COINGECKO] BTC/USD: ${:.2}", price);
        }

        Ok(Some(MarketRecord {
            snapped_at,
            price: market.current_price,
            market_cap: market.market_cap,
            total_volume: market.total_volume,
        }))
    }
}

async fn check_status(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        return Err(MarketDataError::ApiError {
            status: status.as_u16(),
            message: format!("CoinGecko API returned status: {}", status),
        });
    }
    Ok(response.text().await?)
}

fn join_series(chart: MarketChart) -> Result<Vec<MarketRecord>> {
    let index = |series: Series| -> HashMap<i64, Option<f64>> {
        series.into_iter().map(|(ts, v)| (ts as i64, v)).collect()
    };
    let caps = index(chart.market_caps);
    let volumes = index(chart.total_volumes);

    let mut records = Vec::with_capacity(chart.prices.len());
    for (ts, price) in chart.prices {
        let millis = ts as i64;
        let (Some(market_cap), Some(total_volume)) = (caps.get(&millis), volumes.get(&millis))
        else {
            continue;
        };
        let snapped_at = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
            MarketDataError::InvalidData {
                message: format!("Timestamp out of range: {}", millis),
            }
        })?;
        records.push(MarketRecord {
            snapped_at,
            price,
            market_cap: *market_cap,
            total_volume: *total_volume,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn join_keeps_only_timestamps_in_every_series() {
        let chart: MarketChart = serde_json::from_str(
            r#"{
                "prices": [[1704067200000, 42000.0], [1704153600000, 45000.0], [1704240000000, 46000.0]],
                "market_caps": [[1704067200000, 820000000000.0], [1704153600000, 880000000000.0]],
                "total_volumes": [[1704067200000, 9000000000.0], [1704240000000, 1.0]]
            }"#,
        )
        .unwrap();

        let records = join_series(chart).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].snapped_at,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(records[0].price, Some(42000.0));
        assert_eq!(records[0].market_cap, Some(820000000000.0));
        assert_eq!(records[0].total_volume, Some(9000000000.0));
    }

    #[test]
    fn missing_series_join_to_nothing() {
        let chart: MarketChart = serde_json::from_str(r#"{ "prices": [] }"#).unwrap();
        assert!(join_series(chart).unwrap().is_empty());
    }
}
