//! Community dispatch entry point: CLI wiring, one run, report output.

mod cli;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use community_dispatch::dispatch::MicroLpSolver;
use community_dispatch::report::export::{export_overview_json, export_schedule_csv};
use community_dispatch::runner::run_simulation;

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let scenario = cli.scenario()?;

    let report = run_simulation(&scenario, &MicroLpSolver)?;
    let rows = report.rows();

    // Per-period schedule
    if !cli.quiet {
        for row in &rows {
            println!("{row}");
        }
        println!();
    }

    println!("{}", report.metrics);

    if let Some(path) = &cli.schedule_out {
        export_schedule_csv(&rows, path)
            .with_context(|| format!("failed to write schedule CSV {}", path.display()))?;
        info!(path = %path.display(), "schedule written");
    }

    if let Some(path) = &cli.overview_out {
        export_overview_json(&report.overview(), path)
            .with_context(|| format!("failed to write overview JSON {}", path.display()))?;
        info!(path = %path.display(), "overview written");
    }

    Ok(())
}
