//! Greedy per-minute allocation of trades to the outbound channel.
//!
//! Trades are grouped into minute buckets by submission time. Each bucket is
//! processed independently: an optional urgency filter trims the working set
//! and the strategy fixes the ordering, then categories are served in
//! priority order against their per-minute quotas while drawing down a shared
//! message cap.

use flowgate_core::{
    ts_to_minute, ProductCategory, SimConfig, Strategy, TimestampMs, Trade, ALLOCATION_PRIORITY,
};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use tracing::debug;

/// Why a trade never competed for channel capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExclusionReason {
    /// Distance between submission and delivery start exceeded the buffer
    /// threshold.
    UrgencyWindow,
    /// The delivery-interval length matched no listed product.
    Unclassified,
}

/// A trade that entered neither the allocated nor the unallocated set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcludedTrade {
    /// The excluded trade.
    pub trade: Trade,
    /// Why it was excluded.
    pub reason: ExclusionReason,
}

/// Result of one allocation pass.
///
/// `allocated` and `unallocated` partition the trades that competed for
/// channel capacity. `excluded` holds the trades that never competed, so
/// capacity rejection and filter exclusion stay distinguishable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllocationOutcome {
    /// Trades that fit within quota and cap, in bucket order.
    pub allocated: Vec<Trade>,
    /// Trades rejected for capacity, in bucket order.
    pub unallocated: Vec<Trade>,
    /// Trades that never entered allocation.
    pub excluded: Vec<ExcludedTrade>,
}

impl AllocationOutcome {
    /// Total trades across all three sets.
    pub fn total(&self) -> usize {
        self.allocated.len() + self.unallocated.len() + self.excluded.len()
    }
}

/// Allocation engine.
///
/// Holds only configuration; `allocate` reads the input and builds a fresh
/// outcome, so repeated calls over the same trades yield identical results.
pub struct Allocator {
    config: SimConfig,
}

impl Allocator {
    /// Create an allocator with the given configuration.
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Run one allocation pass over the full trade set.
    ///
    /// Buckets are processed in ascending minute order. Within a bucket the
    /// result sets keep the order used for allocation slicing.
    pub fn allocate(&self, trades: &[Trade]) -> AllocationOutcome {
        let mut buckets: BTreeMap<TimestampMs, Vec<&Trade>> = BTreeMap::new();
        for trade in trades {
            buckets
                .entry(ts_to_minute(trade.transaction_ts))
                .or_default()
                .push(trade);
        }

        let mut outcome = AllocationOutcome::default();
        for (minute, bucket) in buckets {
            self.allocate_bucket(minute, bucket, &mut outcome);
        }
        outcome
    }

    /// Allocate a single minute bucket.
    fn allocate_bucket(
        &self,
        minute: TimestampMs,
        bucket: Vec<&Trade>,
        outcome: &mut AllocationOutcome,
    ) {
        let mut working = bucket;

        // Trades too far from delivery never enter the buffer.
        if self.config.buffer.enabled {
            let threshold_ms = self.config.buffer.threshold_ms();
            let (kept, dropped): (Vec<&Trade>, Vec<&Trade>) = working
                .into_iter()
                .partition(|t| t.urgency_ms() <= threshold_ms);
            working = kept;
            outcome
                .excluded
                .extend(dropped.into_iter().map(|t| ExcludedTrade {
                    trade: t.clone(),
                    reason: ExclusionReason::UrgencyWindow,
                }));
        }

        if self.config.strategy == Strategy::MaxMw {
            // Stable sort: equal volumes keep arrival order.
            working.sort_by_key(|t| Reverse(OrderedFloat(t.quantity_mwh)));
        }

        // Bucket-local message counter; no state crosses bucket boundaries.
        let mut message_count = 0usize;
        for category in ALLOCATION_PRIORITY {
            let (matched, rest) = split_category(working, category);
            working = rest;

            let remaining_cap = self
                .config
                .limits
                .max_messages_per_minute
                .saturating_sub(message_count);
            let take = self
                .config
                .limits
                .quota(category)
                .min(remaining_cap)
                .min(matched.len());

            outcome
                .allocated
                .extend(matched[..take].iter().map(|t| (*t).clone()));
            outcome
                .unallocated
                .extend(matched[take..].iter().map(|t| (*t).clone()));
            message_count += take;
        }

        // Only category-less trades can remain; no category pass saw them.
        outcome
            .excluded
            .extend(working.into_iter().map(|t| ExcludedTrade {
                trade: t.clone(),
                reason: ExclusionReason::Unclassified,
            }));

        debug!(minute, messages = message_count, "bucket allocated");
    }
}

/// Split the working set into the subsequence matching `category` and the
/// rest, both preserving relative order.
fn split_category(
    working: Vec<&Trade>,
    category: ProductCategory,
) -> (Vec<&Trade>, Vec<&Trade>) {
    working
        .into_iter()
        .partition(|t| t.category == Some(category))
}
