//! Trade flatfile loading and enrichment.
//!
//! Parses raw rows into enriched trades: the product category is derived from
//! the delivery-interval length and each trade gets a stable synthetic
//! identifier. Timestamp parse failures abort the load; unlisted interval
//! lengths only degrade the row to an unclassified trade.

use chrono::NaiveDateTime;
use flowgate_core::{Error, ProductCategory, Result, TimestampMs, Trade};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Raw row as present in the trade flatfile.
#[derive(Debug, Deserialize)]
struct RawTradeRow {
    #[serde(rename = "TransactionTime")]
    transaction_time: String,
    #[serde(rename = "ProductFromUTC")]
    product_from_utc: String,
    #[serde(rename = "ProductTimeDiffMinutes")]
    product_time_diff_minutes: i64,
    #[serde(rename = "QuantityMWh")]
    quantity_mwh: f64,
}

/// Statistics about a completed load.
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    /// Total rows read.
    pub total_rows: u64,
    /// Rows mapped to hourly products.
    pub hourly_rows: u64,
    /// Rows mapped to half-hourly products.
    pub half_hourly_rows: u64,
    /// Rows mapped to quarter-hourly products.
    pub quarter_hourly_rows: u64,
    /// Rows whose interval length matched no listed product.
    pub unclassified_rows: u64,
    /// Total volume across all rows.
    pub total_quantity_mwh: f64,
}

impl LoadStats {
    /// Fraction of rows that could not be classified.
    pub fn unclassified_frac(&self) -> f64 {
        if self.total_rows > 0 {
            self.unclassified_rows as f64 / self.total_rows as f64
        } else {
            0.0
        }
    }

    fn record(&mut self, category: Option<ProductCategory>, quantity_mwh: f64) {
        self.total_rows += 1;
        self.total_quantity_mwh += quantity_mwh;
        match category {
            Some(ProductCategory::Hourly) => self.hourly_rows += 1,
            Some(ProductCategory::HalfHourly) => self.half_hourly_rows += 1,
            Some(ProductCategory::QuarterHourly) => self.quarter_hourly_rows += 1,
            None => self.unclassified_rows += 1,
        }
    }
}

/// Result of loading a trade flatfile.
#[derive(Debug, Clone)]
pub struct LoadResult {
    /// Enriched trades in file order.
    pub trades: Vec<Trade>,
    /// Load statistics.
    pub stats: LoadStats,
}

/// Load trades from a CSV flatfile on disk.
pub fn load_trades_csv(path: impl AsRef<Path>) -> Result<LoadResult> {
    let file = std::fs::File::open(path.as_ref())?;
    read_trades(file)
}

/// Read trades from any CSV source.
///
/// Rows are enriched in file order and assigned sequential ids starting at
/// zero.
pub fn read_trades<R: Read>(reader: R) -> Result<LoadResult> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut trades = Vec::new();
    let mut stats = LoadStats::default();

    for (idx, record) in csv_reader.deserialize::<RawTradeRow>().enumerate() {
        let row_number = idx + 1;
        let raw = record.map_err(|e| Error::data(format!("row {}: {}", row_number, e)))?;

        let transaction_ts = parse_timestamp(&raw.transaction_time, row_number)?;
        let delivery_start_ts = parse_timestamp(&raw.product_from_utc, row_number)?;
        let category = ProductCategory::from_delivery_minutes(raw.product_time_diff_minutes);

        if category.is_none() {
            warn!(
                row = row_number,
                minutes = raw.product_time_diff_minutes,
                "delivery interval matches no listed product; trade will be excluded"
            );
        }

        stats.record(category, raw.quantity_mwh);
        trades.push(Trade {
            id: idx as u64,
            transaction_ts,
            delivery_start_ts,
            delivery_minutes: raw.product_time_diff_minutes,
            quantity_mwh: raw.quantity_mwh,
            category,
        });
    }

    debug!(
        rows = stats.total_rows,
        unclassified = stats.unclassified_rows,
        "trade flatfile loaded"
    );

    Ok(LoadResult { trades, stats })
}

/// Parse a flatfile timestamp into epoch milliseconds.
///
/// Accepts RFC 3339, or naive `YYYY-MM-DD HH:MM:SS[.fff]` treated as UTC.
fn parse_timestamp(text: &str, row_number: usize) -> Result<TimestampMs> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(text) {
        return Ok(dt.timestamp_millis());
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .map(|dt| dt.and_utc().timestamp_millis())
        .map_err(|e| Error::timestamp(format!("row {}: {:?}: {}", row_number, text, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_csv(rows: &[&str]) -> String {
        let mut csv = String::from("TransactionTime,ProductFromUTC,ProductTimeDiffMinutes,QuantityMWh\n");
        for row in rows {
            csv.push_str(row);
            csv.push('\n');
        }
        csv
    }

    #[test]
    fn test_load_basic() {
        let csv = sample_csv(&[
            "2024-01-15 10:00:30,2024-01-15 11:00:00,60,12.5",
            "2024-01-15 10:00:45,2024-01-15 10:30:00,30,-3.0",
            "2024-01-15 10:01:10,2024-01-15 10:15:00,15,7.25",
        ]);
        let result = read_trades(csv.as_bytes()).unwrap();

        assert_eq!(result.trades.len(), 3);
        assert_eq!(result.stats.total_rows, 3);
        assert_eq!(result.stats.hourly_rows, 1);
        assert_eq!(result.stats.half_hourly_rows, 1);
        assert_eq!(result.stats.quarter_hourly_rows, 1);
        assert_eq!(result.stats.unclassified_rows, 0);

        // Sequential ids in file order.
        let ids: Vec<u64> = result.trades.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);

        let first = &result.trades[0];
        assert_eq!(first.category, Some(ProductCategory::Hourly));
        let expected = Utc
            .with_ymd_and_hms(2024, 1, 15, 10, 0, 30)
            .unwrap()
            .timestamp_millis();
        assert_eq!(first.transaction_ts, expected);
        assert!((first.quantity_mwh - 12.5).abs() < 1e-10);
    }

    #[test]
    fn test_rfc3339_timestamps_accepted() {
        let csv = sample_csv(&["2024-01-15T10:00:30+00:00,2024-01-15T11:00:00+00:00,60,1.0"]);
        let result = read_trades(csv.as_bytes()).unwrap();
        let expected = Utc
            .with_ymd_and_hms(2024, 1, 15, 10, 0, 30)
            .unwrap()
            .timestamp_millis();
        assert_eq!(result.trades[0].transaction_ts, expected);
    }

    #[test]
    fn test_fractional_seconds() {
        let csv = sample_csv(&["2024-01-15 10:00:30.250,2024-01-15 11:00:00,60,1.0"]);
        let result = read_trades(csv.as_bytes()).unwrap();
        let whole = Utc
            .with_ymd_and_hms(2024, 1, 15, 10, 0, 30)
            .unwrap()
            .timestamp_millis();
        assert_eq!(result.trades[0].transaction_ts, whole + 250);
    }

    #[test]
    fn test_unclassified_row_counted() {
        let csv = sample_csv(&[
            "2024-01-15 10:00:30,2024-01-15 11:00:00,60,1.0",
            "2024-01-15 10:00:40,2024-01-15 11:00:00,45,2.0",
        ]);
        let result = read_trades(csv.as_bytes()).unwrap();

        // The row stays in the output with no category; only the stats flag it.
        assert_eq!(result.trades.len(), 2);
        assert_eq!(result.trades[1].category, None);
        assert_eq!(result.stats.unclassified_rows, 1);
        assert!((result.stats.unclassified_frac() - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_malformed_timestamp_fails() {
        let csv = sample_csv(&[
            "2024-01-15 10:00:30,2024-01-15 11:00:00,60,1.0",
            "not-a-timestamp,2024-01-15 11:00:00,60,1.0",
        ]);
        let err = read_trades(csv.as_bytes()).unwrap_err();
        match err {
            Error::Timestamp(msg) => assert!(msg.contains("row 2")),
            other => panic!("expected timestamp error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_volume_fails() {
        let csv = sample_csv(&["2024-01-15 10:00:30,2024-01-15 11:00:00,60,lots"]);
        assert!(matches!(
            read_trades(csv.as_bytes()),
            Err(Error::Data(_))
        ));
    }

    #[test]
    fn test_empty_file() {
        let csv = sample_csv(&[]);
        let result = read_trades(csv.as_bytes()).unwrap();
        assert!(result.trades.is_empty());
        assert_eq!(result.stats.total_rows, 0);
        assert_eq!(result.stats.unclassified_frac(), 0.0);
    }

    #[test]
    fn test_total_quantity_accumulates() {
        let csv = sample_csv(&[
            "2024-01-15 10:00:30,2024-01-15 11:00:00,60,12.5",
            "2024-01-15 10:00:45,2024-01-15 10:30:00,30,-3.0",
        ]);
        let result = read_trades(csv.as_bytes()).unwrap();
        assert!((result.stats.total_quantity_mwh - 9.5).abs() < 1e-10);
    }
}
