//! wfscan CLI

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueHint};
use log::info;

use wfscan_core::locate::{CacheEnv, CacheLocator, Platform};
use wfscan_core::pipeline::{DiscoveryPipeline, ScanOptions};
use wfscan_core::recency::RecencyFilter;
use wfscan_core::report::{write_json_pretty, write_ndjson, write_text};

/// CLI entrypoint for wfscan.
#[derive(Debug, Parser)]
#[command(
    name = "wfscan",
    about = "List the OpenType GSUB/GPOS features of web fonts a browser cached recently"
)]
pub struct Cli {
    /// Scan this directory instead of the platform's browser caches
    #[arg(long = "root", value_hint = ValueHint::DirPath)]
    root: Option<PathBuf>,

    /// Only consider files modified within this many seconds
    #[arg(long = "window", value_name = "SECONDS", default_value_t = 180)]
    window: u64,

    /// Consider every file regardless of age
    #[arg(long = "all", action = ArgAction::SetTrue, conflicts_with = "window")]
    all: bool,

    /// Keep decompressed fonts instead of deleting their scratch directories
    #[arg(long = "keep-scratch", action = ArgAction::SetTrue)]
    keep_scratch: bool,

    /// Follow symlinks while walking roots
    #[arg(long = "follow-symlinks", action = ArgAction::SetTrue)]
    follow_symlinks: bool,

    /// Number of worker threads
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    jobs: Option<usize>,

    /// Also list features per script/language system
    #[arg(long = "by-script", action = ArgAction::SetTrue)]
    by_script: bool,

    /// Emit a single JSON array
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit newline-delimited JSON
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,
}

/// Parse CLI args and run the scan.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let locator = CacheLocator::new(Platform::current(), CacheEnv::from_process());
    let stdout = io::stdout();
    run_scan(&cli, &locator, stdout.lock())
}

fn run_scan(cli: &Cli, locator: &CacheLocator, mut out: impl Write) -> Result<()> {
    let roots = resolve_roots(cli, locator)?;
    let pipeline = DiscoveryPipeline::new(scan_options(cli));
    let summary = pipeline.scan(&roots)?;

    if cli.ndjson {
        write_ndjson(&summary.reports, &mut out)?;
    } else if cli.json {
        write_json_pretty(&summary.reports, &mut out)?;
    } else {
        write_text(&summary.reports, cli.by_script, &mut out)?;
    }
    out.flush()?;

    info!(
        "examined {} files: {} fonts reported, {} skipped",
        summary.examined,
        summary.reports.len(),
        summary.skipped.len()
    );
    Ok(())
}

fn resolve_roots(cli: &Cli, locator: &CacheLocator) -> Result<Vec<PathBuf>> {
    if let Some(root) = &cli.root {
        return Ok(vec![root.clone()]);
    }

    let roots = locator
        .roots()
        .with_context(|| format!("locating browser caches on {}", locator.platform()))?;
    Ok(roots.into_iter().collect())
}

fn scan_options(cli: &Cli) -> ScanOptions {
    let recency = if cli.all {
        RecencyFilter::always()
    } else {
        RecencyFilter::within(Duration::from_secs(cli.window))
    };

    ScanOptions {
        recency,
        keep_scratch: cli.keep_scratch,
        follow_symlinks: cli.follow_symlinks,
        jobs: cli.jobs,
    }
}
