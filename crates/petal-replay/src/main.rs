//! Petal Replay - run an order file through the matching engine.
//!
//! Reads order requests from a CSV file, matches them, and writes one
//! execution report row per event. Logs throughput, submit latency and
//! the final state of every book when done.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use petal_core::{MatchingEngine, Price};
use petal_metrics::{ExecutionStats, LatencyHistogram, Stopwatch};
use petal_proto::{ExecutionWriter, OrderReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "petal-replay", version)]
#[command(about = "Match an order file and write execution reports")]
struct Cli {
    /// Order file to read
    #[arg(long, default_value = "orders.csv")]
    input: PathBuf,

    /// Execution report file to write
    #[arg(long, default_value = "execution_rep.csv")]
    output: PathBuf,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Skip the statistics and latency summary
    #[arg(long)]
    no_stats: bool,
}

/// What a finished replay leaves behind.
struct Replay {
    engine: MatchingEngine,
    stats: ExecutionStats,
    latency: LatencyHistogram,
    elapsed: Duration,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&cli.log_level)
            .with_context(|| format!("invalid log level {:?}", cli.log_level))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_line_number(true)
        .init();

    let replay = run(&cli)?;
    if !cli.no_stats {
        log_summary(&replay);
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<Replay> {
    let input = File::open(&cli.input)
        .with_context(|| format!("failed to open order file {}", cli.input.display()))?;
    let output = File::create(&cli.output)
        .with_context(|| format!("failed to create report file {}", cli.output.display()))?;

    let reader = OrderReader::new(BufReader::new(input));
    let mut writer = ExecutionWriter::new(output)
        .with_context(|| format!("failed to write header to {}", cli.output.display()))?;

    let mut engine = MatchingEngine::default();
    let mut stats = ExecutionStats::new();
    let mut latency = LatencyHistogram::new();
    let watch = Stopwatch::new();
    let mut reports = Vec::new();

    info!(input = %cli.input.display(), output = %cli.output.display(), "replay started");
    let started = Instant::now();

    for request in reader {
        let request = request.with_context(|| format!("failed to read {}", cli.input.display()))?;

        reports.clear();
        watch.time(&mut latency, || engine.submit_into(request, &mut reports));
        stats.record(&reports);

        writer
            .write_reports(&reports)
            .with_context(|| format!("failed to write {}", cli.output.display()))?;
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush {}", cli.output.display()))?;
    let elapsed = started.elapsed();
    info!(requests = stats.requests, reports = writer.written(), ?elapsed, "replay finished");

    Ok(Replay { engine, stats, latency, elapsed })
}

fn log_summary(replay: &Replay) {
    let rate = replay.stats.requests as f64 / replay.elapsed.as_secs_f64().max(f64::EPSILON);
    info!(stats = %replay.stats, "executions");
    info!(latency = %replay.latency.summary(), rate = %format!("{rate:.0} orders/sec"), "submit");

    for book in replay.engine.books() {
        info!(
            instrument = book.name(),
            bids = book.bids().len(),
            asks = book.asks().len(),
            best_bid = %price_or_dash(book.best_bid()),
            best_ask = %price_or_dash(book.best_ask()),
            "book"
        );
    }
}

fn price_or_dash(price: Option<Price>) -> String {
    price.map_or_else(|| "-".to_string(), |p| p.to_string())
}
