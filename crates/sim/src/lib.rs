//! Allocation engine for the flowgate system.
//!
//! This crate provides:
//! - Minute-bucket allocation under category quotas and a shared message cap
//! - Urgency buffering and strategy ordering
//! - Summary aggregation of unallocated trades

pub mod allocator;
pub mod summary;

pub use allocator::{AllocationOutcome, Allocator, ExcludedTrade, ExclusionReason};
pub use summary::{summarize, CategorySummary};
