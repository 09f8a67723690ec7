//! LP Yield Engine CLI
//!
//! Loads a liquidity position snapshot and prints the dashboard analytics
//! report: aggregates, ROI projections, maturity info, and chart series.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use lp_yield_engine::position::{load_positions_csv, load_positions_json, LiquidityPosition};
use lp_yield_engine::projection::{earned_to_date, AnalyticsSnapshot, DEFAULT_MONTH_WINDOW};
use lp_yield_engine::ticker::RefreshTimer;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SnapshotFormat {
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "lp-yield",
    version,
    about = "Liquidity-provider yield projection report"
)]
struct Cli {
    /// Snapshot file: ledger API JSON envelope or CSV export
    file: PathBuf,

    /// Override format detection by file extension
    #[arg(long, value_enum)]
    format: Option<SnapshotFormat>,

    /// Chart window in calendar months
    #[arg(long, default_value_t = DEFAULT_MONTH_WINDOW)]
    months: usize,

    /// Reference timestamp (RFC 3339); defaults to the current time
    #[arg(long)]
    as_of: Option<String>,

    /// Write both chart series to a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Re-print the earned-ROI line every N seconds until interrupted
    #[arg(long, value_name = "SECS")]
    watch: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let as_of = match &cli.as_of {
        Some(text) => DateTime::parse_from_rfc3339(text)
            .with_context(|| format!("invalid --as-of timestamp: {}", text))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let format = cli.format.unwrap_or_else(|| detect_format(&cli.file));
    let positions = match format {
        SnapshotFormat::Json => load_positions_json(&cli.file, as_of),
        SnapshotFormat::Csv => load_positions_csv(&cli.file, as_of),
    }
    .with_context(|| format!("failed to load snapshot from {}", cli.file.display()))?;

    let snapshot = AnalyticsSnapshot::compute(&positions, as_of, cli.months);
    print_report(&snapshot);

    if let Some(path) = &cli.csv {
        write_series_csv(path, &snapshot)
            .with_context(|| format!("failed to write series CSV to {}", path.display()))?;
        println!("\nSeries written to: {}", path.display());
    }

    if let Some(secs) = cli.watch {
        watch_earned(positions, secs.max(1));
    }

    Ok(())
}

fn detect_format(path: &std::path::Path) -> SnapshotFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => SnapshotFormat::Csv,
        _ => SnapshotFormat::Json,
    }
}

fn print_report(snapshot: &AnalyticsSnapshot) {
    println!("LP Yield Engine v0.1.0");
    println!("======================\n");

    println!("As of: {}", snapshot.as_of.to_rfc3339());
    println!(
        "Positions: {} ({} matured)",
        snapshot.position_count, snapshot.matured_count
    );
    println!();

    println!("Portfolio:");
    println!("  Total Liquidity:    ${:.2}", snapshot.aggregate.total_amount);
    println!(
        "  Display Rate:       {:.1}% APY{}",
        snapshot.display_rate,
        if snapshot.rate_is_fallback { " (tier fallback)" } else { "" }
    );
    println!(
        "  Weighted Duration:  {:.0} months",
        snapshot.aggregate.weighted_duration
    );
    println!();

    println!("Projection:");
    println!("  Expected Total ROI: ${:.2}", snapshot.expected_return);
    println!("  Earned ROI:         ${:.2}", snapshot.earned_to_date);
    match snapshot.nearest_maturity {
        Some(maturity) => println!("  Next Maturity:      {}", maturity.format("%b %-d, %Y")),
        None => println!("  Next Maturity:      none"),
    }
    println!(
        "  Withdraw:           {}",
        if snapshot.withdraw_available { "available" } else { "locked until maturity" }
    );
    println!();

    println!("{:>6} {:>16} {:>18}", "Month", "Earned ROI", "Active Liquidity");
    println!("{}", "-".repeat(42));
    for (earned, active) in snapshot
        .earned_series
        .iter()
        .zip(&snapshot.active_liquidity_series)
    {
        println!("{:>6} {:>16.2} {:>18.2}", earned.label, earned.value, active.value);
    }
}

fn write_series_csv(path: &std::path::Path, snapshot: &AnalyticsSnapshot) -> Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "Month,EarnedRoi,ActiveLiquidity")?;
    for (earned, active) in snapshot
        .earned_series
        .iter()
        .zip(&snapshot.active_liquidity_series)
    {
        writeln!(file, "{},{:.2},{:.2}", earned.label, earned.value, active.value)?;
    }
    Ok(())
}

/// Live mode: re-evaluate earned ROI against the wall clock on a fixed
/// cadence until the process is interrupted
fn watch_earned(positions: Vec<LiquidityPosition>, period_secs: u64) {
    println!("\nWatching earned ROI (Ctrl-C to stop):");

    let _timer = RefreshTimer::start(Duration::from_secs(period_secs), move || {
        let now = Utc::now();
        println!(
            "  {}  earned ${:.4}",
            now.format("%H:%M:%S"),
            earned_to_date(&positions, now)
        );
    });

    loop {
        std::thread::park();
    }
}
