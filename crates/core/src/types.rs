//! Core data types for the flowgate system.

use serde::{Deserialize, Serialize};

/// Timestamp in milliseconds since Unix epoch (UTC).
pub type TimestampMs = i64;

/// Volume in megawatt-hours. Signed: sells carry negative quantities.
pub type Mwh = f64;

/// Stable synthetic trade identifier, assigned sequentially at ingestion time.
pub type TradeId = u64;

/// Milliseconds in one minute.
pub const MINUTE_MS: i64 = 60_000;

/// Convert a timestamp to its minute boundary.
#[inline]
pub fn ts_to_minute(ts_ms: TimestampMs) -> TimestampMs {
    (ts_ms / MINUTE_MS) * MINUTE_MS
}

/// Product granularity of an intraday energy contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    /// 60-minute delivery window.
    Hourly,
    /// 30-minute delivery window.
    HalfHourly,
    /// 15-minute delivery window.
    QuarterHourly,
}

/// Order in which categories are served within a minute bucket.
///
/// The shared message cap is drawn down in this order, so earlier entries are
/// favored when the cap binds.
pub const ALLOCATION_PRIORITY: [ProductCategory; 3] = [
    ProductCategory::Hourly,
    ProductCategory::HalfHourly,
    ProductCategory::QuarterHourly,
];

impl ProductCategory {
    /// Derive the category from a delivery-interval length in minutes.
    ///
    /// Returns `None` for interval lengths with no listed product.
    pub fn from_delivery_minutes(minutes: i64) -> Option<Self> {
        match minutes {
            60 => Some(ProductCategory::Hourly),
            30 => Some(ProductCategory::HalfHourly),
            15 => Some(ProductCategory::QuarterHourly),
            _ => None,
        }
    }

    /// Delivery window length in minutes.
    #[inline]
    pub fn delivery_minutes(self) -> i64 {
        match self {
            ProductCategory::Hourly => 60,
            ProductCategory::HalfHourly => 30,
            ProductCategory::QuarterHourly => 15,
        }
    }

    /// Label used in summary output.
    pub fn label(self) -> &'static str {
        match self {
            ProductCategory::Hourly => "Hourly",
            ProductCategory::HalfHourly => "HalfHourly",
            ProductCategory::QuarterHourly => "QuarterHourly",
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single energy trade awaiting transmission on the outbound channel.
///
/// Trades are immutable once loaded; the engine only reclassifies them into
/// result sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Synthetic identifier, stable for the whole run.
    pub id: TradeId,
    /// Submission timestamp (ms).
    pub transaction_ts: TimestampMs,
    /// Start of the product's delivery window (ms).
    pub delivery_start_ts: TimestampMs,
    /// Declared delivery-interval length in minutes.
    pub delivery_minutes: i64,
    /// Traded volume in MWh.
    pub quantity_mwh: Mwh,
    /// Derived product category. `None` if the interval length is unlisted.
    pub category: Option<ProductCategory>,
}

impl Trade {
    /// Absolute distance between submission and delivery start (ms).
    ///
    /// Only consulted while the trade's minute bucket is being processed.
    #[inline]
    pub fn urgency_ms(&self) -> i64 {
        (self.delivery_start_ts - self.transaction_ts).abs()
    }

    /// Minute bucket this trade falls into.
    #[inline]
    pub fn minute(&self) -> TimestampMs {
        ts_to_minute(self.transaction_ts)
    }
}
