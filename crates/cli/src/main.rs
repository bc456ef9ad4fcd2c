//! Command-line runner for the flowgate allocation simulator.
//!
//! Usage: `flowgate <trades.csv> [strategy] [buffer-threshold-minutes]`
//!
//! The strategy is `FirstArrive` or `MaxMW`. Passing a third argument enables
//! urgency buffering with the given threshold.

use anyhow::{bail, Context};
use flowgate_core::{SimConfig, Strategy};
use flowgate_ingestion::load_trades_csv;
use flowgate_sim::{summarize, Allocator};
use prettytable::{row, Table};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        bail!("usage: flowgate <trades.csv> [strategy] [buffer-threshold-minutes]");
    }

    let mut config = SimConfig::default();
    if let Some(name) = args.get(1) {
        config.strategy = Strategy::from_name(name);
    }
    if let Some(threshold) = args.get(2) {
        config.buffer.enabled = true;
        config.buffer.threshold_minutes = threshold
            .parse()
            .with_context(|| format!("invalid buffer threshold: {}", threshold))?;
    }

    let loaded = load_trades_csv(&args[0])
        .with_context(|| format!("failed to load trades from {}", args[0]))?;
    info!(
        rows = loaded.stats.total_rows,
        unclassified = loaded.stats.unclassified_rows,
        "trades loaded"
    );

    let allocator = Allocator::new(config);
    let outcome = allocator.allocate(&loaded.trades);
    info!(
        allocated = outcome.allocated.len(),
        unallocated = outcome.unallocated.len(),
        excluded = outcome.excluded.len(),
        "allocation complete"
    );

    let summary = summarize(&outcome.unallocated);
    let mut table = Table::new();
    table.add_row(row!["Category", "Unallocated MWh", "Unallocated Trades"]);
    for (category, stats) in &summary {
        table.add_row(row![
            category,
            format!("{:.3}", stats.total_mwh),
            stats.trade_count
        ]);
    }
    table.printstd();

    Ok(())
}
