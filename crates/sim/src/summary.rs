//! Summary aggregation over unallocated trades.

use flowgate_core::{Mwh, ProductCategory, Trade};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate volume and count for one product category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Total volume in MWh.
    pub total_mwh: Mwh,
    /// Number of trades.
    pub trade_count: u32,
}

/// Aggregate unallocated trades by product category.
///
/// Categories with no trades are absent from the result; an empty input
/// yields an empty map. Trades without a category are skipped.
pub fn summarize(unallocated: &[Trade]) -> BTreeMap<ProductCategory, CategorySummary> {
    let mut summary: BTreeMap<ProductCategory, CategorySummary> = BTreeMap::new();
    for trade in unallocated {
        if let Some(category) = trade.category {
            let entry = summary.entry(category).or_default();
            entry.total_mwh += trade.quantity_mwh;
            entry.trade_count += 1;
        }
    }
    summary
}
