//! CLI entry point for the harvester tool.

use anyhow::{Context, Result};
use clap::Parser;
use harvester_core::{Harvester, ProgressReporter, SilentProgress};
use tracing::{debug, info};

mod app_config;
mod cli;
mod commands;
mod output;
mod terminal;

use cli::Args;
use output::ConsoleProgress;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    let default_level = terminal::resolve_default_log_level(args.quiet, args.verbose);
    let force_cli_level = args.quiet || args.verbose > 0;
    terminal::init_tracing(
        default_level,
        force_cli_level,
        terminal::is_no_color_requested(args.no_color),
    );
    debug!(?args, "CLI arguments parsed");

    let file_config = app_config::load_file_config(args.config.as_deref())?;
    let config = app_config::build_harvest_config(&args, file_config.as_ref())?;
    info!(
        page = %config.page_url,
        output_dir = %config.output_dir.display(),
        extensions = %config.extensions,
        "Harvester starting"
    );

    let progress: &dyn ProgressReporter = if args.quiet {
        &SilentProgress
    } else {
        &ConsoleProgress
    };
    let harvester = Harvester::new(config);

    if args.dry_run {
        return commands::run_dry_run_preview(&harvester, progress).await;
    }

    let report = harvester.run(progress).await.context("harvest aborted")?;
    info!(
        links = report.links_found,
        files = report.files_written,
        bytes = report.bytes_written,
        "Harvest complete"
    );
    Ok(())
}
