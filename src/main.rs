//! # Connections Archive
//!
//! A scraper that fetches the daily NYT "Connections" answer set from
//! third-party answer pages and appends it to a local JSON archive.
//!
//! ## Usage
//!
//! ```sh
//! connections_archive -a ./puzzles
//! ```
//!
//! ## Architecture
//!
//! One run is a single sequential pipeline:
//! 1. **Load**: read the previous snapshot from `latest.json`
//! 2. **Fetch**: try each configured source, up to two passes with a delay
//! 3. **Parse**: slice answer sections out of the page and extract categories
//! 4. **Decide**: discard anything matching a known snapshot; pin a date
//! 5. **Write**: on a fresh result, write `<date>.json`, `latest.json`, and
//!    the manifest; a stale day writes nothing and still exits 0

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod archive;
mod cli;
mod config;
mod fetch;
mod freshness;
mod models;
mod parse;
mod utils;

use cli::Cli;
use config::{Config, RetryPolicy};
use fetch::{HttpFetcher, Orchestrator, Outcome};
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("connections_archive starting up");

    let args = Cli::parse();
    debug!(?args.archive_dir, args.dry_run, "Parsed CLI arguments");

    // Early check: a run that can't write its result shouldn't fetch at all.
    if !args.dry_run {
        if let Err(e) = ensure_writable_dir(&args.archive_dir).await {
            tracing::error!(
                path = %args.archive_dir,
                error = %e,
                "Archive directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let config = Config {
        retry: RetryPolicy {
            max_passes: args.max_passes,
            pass_delay: Duration::from_secs(args.pass_delay_secs),
        },
        ..Config::default()
    };
    info!(
        sources = config.sources.len(),
        max_passes = config.retry.max_passes,
        "Configured sources"
    );

    let prev = archive::load_prev(&args.archive_dir).await;
    match prev.date {
        Some(date) => info!(%date, "Previous snapshot loaded"),
        None => info!("No previous snapshot; first run against this archive"),
    }

    let orchestrator = Orchestrator::new(config, HttpFetcher::new()?);
    let outcome = orchestrator.run(&prev).await;

    match outcome {
        Outcome::Stale { reason } => {
            // Expected steady state while the upstream page lags the puzzle.
            info!(%reason, "No new puzzle yet; skipping write");
        }
        Outcome::Fresh { puzzle, source } => {
            if args.dry_run {
                info!(%source, date = %puzzle.date, "Dry run; not writing");
                println!("{}", serde_json::to_string_pretty(&puzzle)?);
            } else {
                archive::write_puzzle(&args.archive_dir, &puzzle).await?;
                info!(
                    %source,
                    date = %puzzle.date,
                    archive_dir = %args.archive_dir,
                    "Saved puzzle (latest + archive) and updated manifest"
                );
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        date = %Utc::now().date_naive(),
        "Execution complete"
    );

    Ok(())
}
