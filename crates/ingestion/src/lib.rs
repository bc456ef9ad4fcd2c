//! Trade record ingestion for the flowgate system.
//!
//! This crate handles:
//! - CSV flatfile loading
//! - Timestamp parsing
//! - Product category derivation
//! - Load statistics

pub mod loader;

pub use loader::{load_trades_csv, read_trades, LoadResult, LoadStats};
