//! Dishfeed probe
//!
//! Drives a `FeedController` against the configured backend and prints the
//! resulting feed as JSON. Useful for checking backend wiring, follow/block
//! data and pagination without a client build.
//!
//! Usage: `dishfeed-probe [global|social] [pages]`

mod probe;

use anyhow::{Context, Result};
use dishfeed_engine::Config;
use probe::ProbeOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Log to stderr; stdout carries the JSON report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,dishfeed_engine=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = ProbeOptions::from_args(std::env::args().skip(1))?;
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing::info!(mode = %options.mode, pages = options.pages, "Starting feed probe");
    let report = probe::run(&config, &options).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
