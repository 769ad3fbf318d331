//! Daily BTC history kept as a CSV file.
//!
//! Columns are `snapped_at,price,market_cap,total_volume`. Rows are
//! written sorted by date with `snapped_at` as a bare `YYYY-MM-DD`.

use crate::error::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

pub const HEADER: [&str; 4] = ["snapped_at", "price", "market_cap", "total_volume"];

#[derive(Debug, Clone, PartialEq)]
pub struct MarketRecord {
    pub snapped_at: DateTime<Utc>,
    pub price: Option<f64>,
    pub market_cap: Option<f64>,
    pub total_volume: Option<f64>,
}

impl MarketRecord {
    pub fn date(&self) -> NaiveDate {
        self.snapped_at.date_naive()
    }
}

/// Loads every parseable row.
///
/// A missing or empty file, or one without a `snapped_at` column, is an
/// empty history. Rows whose date cannot be parsed are skipped.
pub fn read_records(path: &Path) -> Result<Vec<MarketRecord>> {
    if !path.exists() || std::fs::metadata(path)?.len() == 0 {
        debug!("No history at {}, starting empty", path.display());
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();

    let Some(date_idx) = headers.iter().position(|h| h.trim() == "snapped_at") else {
        warn!("{} has no snapped_at column, ignoring contents", path.display());
        return Ok(Vec::new());
    };
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let (price_idx, cap_idx, volume_idx) =
        (column("price"), column("market_cap"), column("total_volume"));

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in reader.records() {
        let row = row?;
        let Some(snapped_at) = row.get(date_idx).and_then(parse_timestamp) else {
            skipped += 1;
            continue;
        };
        let number = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .and_then(|v| v.trim().parse::<f64>().ok())
        };
        records.push(MarketRecord {
            snapped_at,
            price: number(price_idx),
            market_cap: number(cap_idx),
            total_volume: number(volume_idx),
        });
    }

    if skipped > 0 {
        warn!("Skipped {} rows with unreadable dates in {}", skipped, path.display());
    }

    Ok(records)
}

/// Sorts by timestamp and overwrites `path`.
pub fn write_records(path: &Path, records: &mut [MarketRecord]) -> Result<()> {
    records.sort_by_key(|r| r.snapped_at);

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADER)?;
    for record in records.iter() {
        writer.write_record([
            record.date().format("%Y-%m-%d").to_string(),
            format_number(record.price),
            format_number(record.market_cap),
            format_number(record.total_volume),
        ])?;
    }
    writer.flush()?;

    Ok(())
}

/// Appends the fetched rows whose date is not already present.
///
/// Returns how many rows were added.
pub fn merge_new_days(existing: &mut Vec<MarketRecord>, fetched: Vec<MarketRecord>) -> usize {
    let mut known: HashSet<NaiveDate> = existing.iter().map(MarketRecord::date).collect();
    let before = existing.len();

    for record in fetched {
        if known.insert(record.date()) {
            existing.push(record);
        }
    }

    existing.len() - before
}

/// Drops every row dated the same day as `record`, then appends it.
pub fn replace_day(existing: &mut Vec<MarketRecord>, record: MarketRecord) {
    let day = record.date();
    existing.retain(|r| r.date() != day);
    existing.push(record);
}

fn format_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(ts.with_timezone(&Utc));
    }
    // CoinGecko's CSV export writes "2013-04-28 00:00:00 UTC".
    let naive = raw.strip_suffix(" UTC").unwrap_or(raw);
    if let Ok(ts) = NaiveDateTime::parse_from_str(naive, "%Y-%m-%d %H:%M:%S") {
        return Some(ts.and_utc());
    }
    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}
