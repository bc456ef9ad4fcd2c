//! Configuration structures for the flowgate system.

use crate::error::Result;
use crate::types::{ProductCategory, MINUTE_MS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for an allocation simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Prioritization strategy applied within each minute bucket.
    pub strategy: Strategy,
    /// Urgency buffering.
    pub buffer: BufferConfig,
    /// Outbound channel limits.
    pub limits: ChannelLimits,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::FirstArrive,
            buffer: BufferConfig::default(),
            limits: ChannelLimits::default(),
        }
    }
}

impl SimConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Trade prioritization strategy within a minute bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Keep arrival order.
    FirstArrive,
    /// Largest volumes first.
    #[serde(rename = "MaxMW")]
    MaxMw,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::FirstArrive
    }
}

impl Strategy {
    /// Map a strategy name to a variant.
    ///
    /// Unrecognized names select `FirstArrive`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "MaxMW" => Strategy::MaxMw,
            _ => Strategy::FirstArrive,
        }
    }
}

/// Urgency buffering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BufferConfig {
    /// Whether the urgency filter is applied before allocation.
    pub enabled: bool,
    /// Maximum allowed distance between submission and delivery start (minutes).
    pub threshold_minutes: u32,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold_minutes: 60,
        }
    }
}

impl BufferConfig {
    /// Threshold in milliseconds.
    #[inline]
    pub fn threshold_ms(&self) -> i64 {
        self.threshold_minutes as i64 * MINUTE_MS
    }
}

/// Per-minute limits of the outbound exchange channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelLimits {
    /// Messages the channel accepts per minute, shared across all categories.
    pub max_messages_per_minute: usize,
    /// Per-minute trade budget for hourly products.
    pub hourly_quota: usize,
    /// Per-minute trade budget for half-hourly products.
    pub half_hourly_quota: usize,
    /// Per-minute trade budget for quarter-hourly products.
    pub quarter_hourly_quota: usize,
}

impl Default for ChannelLimits {
    fn default() -> Self {
        Self {
            max_messages_per_minute: 60,
            hourly_quota: 48,
            half_hourly_quota: 96,
            quarter_hourly_quota: 192,
        }
    }
}

impl ChannelLimits {
    /// Per-minute budget for the given category.
    pub fn quota(&self, category: ProductCategory) -> usize {
        match category {
            ProductCategory::Hourly => self.hourly_quota,
            ProductCategory::HalfHourly => self.half_hourly_quota,
            ProductCategory::QuarterHourly => self.quarter_hourly_quota,
        }
    }
}
