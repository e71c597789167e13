//! refmerge CLI
//!
//! Applies the embedded reference updates onto the atlas record store.
//!
//! **Usage:**
//! ```bash
//! refmerge [--store <PATH>] [--dry-run] [--verbose]
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use refmerge::{MergeConfig, MergeEngine, RunMode, DEFAULT_STORE_PATH};

/// Reference record updater
#[derive(Parser, Debug)]
#[command(name = "refmerge", version)]
#[command(about = "Apply curated region descriptions onto the reference record store")]
struct Args {
    /// Record store to update
    #[arg(long, value_name = "PATH", env = "REFMERGE_STORE", default_value = DEFAULT_STORE_PATH)]
    store: PathBuf,

    /// Merge and report without writing the store
    #[arg(long)]
    dry_run: bool,

    /// Log per-record detail (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    info!("refmerge v{}", env!("CARGO_PKG_VERSION"));

    let config = MergeConfig {
        store_path: args.store,
        mode: if args.dry_run { RunMode::DryRun } else { RunMode::Apply },
    }
    .validate()?;

    let engine = MergeEngine::from_config(&config);
    let summary = engine
        .run(config.mode)
        .with_context(|| format!("merge into {} failed", config.store_path.display()))?;

    info!(
        changed_records = summary.report.changed_ids.len(),
        touched_records = summary.report.records_touched,
        store_records = summary.records_in_store,
        written = summary.persisted.is_some(),
        "done"
    );
    Ok(())
}
