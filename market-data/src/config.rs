use crate::error::{MarketDataError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// CoinGecko public API base URL.
pub const COINGECKO_API_BASE: &str = "https://api.coingecko.com/api/v3";

#[derive(Debug, Clone)]
pub struct MarketDataConfig {
    /// Daily history file, one row per date.
    pub csv_path: PathBuf,
    pub api_base_url: String,
    pub coin_id: String,
    pub vs_currency: String,
    /// How far back the history refresh looks.
    pub history_days: u32,
    pub timeout: Duration,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("btc-usd-max.csv"),
            api_base_url: COINGECKO_API_BASE.to_string(),
            coin_id: "bitcoin".to_string(),
            vs_currency: "usd".to_string(),
            history_days: 7,
            timeout: Duration::from_secs(30),
        }
    }
}

impl MarketDataConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let history_days = match env::var("MARKET_HISTORY_DAYS") {
            Ok(raw) => raw.parse::<u32>().map_err(|_| {
                MarketDataError::ConfigError("Invalid MARKET_HISTORY_DAYS".to_string())
            })?,
            Err(_) => defaults.history_days,
        };

        let timeout = match env::var("MARKET_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(raw.parse::<u64>().map_err(|_| {
                MarketDataError::ConfigError("Invalid MARKET_TIMEOUT_SECS".to_string())
            })?),
            Err(_) => defaults.timeout,
        };

        Ok(Self {
            csv_path: env::var("MARKET_CSV_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.csv_path),
            api_base_url: env::var("COINGECKO_API_BASE_URL").unwrap_or(defaults.api_base_url),
            coin_id: defaults.coin_id,
            vs_currency: defaults.vs_currency,
            history_days,
            timeout,
        })
    }
}
