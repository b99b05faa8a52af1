//! Dry-run flow: fetch and resolve, then list targets without downloading.

use anyhow::{Context, Result};
use harvester_core::{Harvester, ProgressReporter};
use tracing::info;

pub async fn run_dry_run_preview(
    harvester: &Harvester,
    progress: &dyn ProgressReporter,
) -> Result<()> {
    let plan = harvester
        .plan(progress)
        .await
        .context("could not build download plan")?;
    info!(targets = plan.targets.len(), "Planned downloads (dry run)");

    if plan.targets.is_empty() {
        println!("No links matching {} found.", harvester.config().extensions);
    }
    for target in &plan.targets {
        println!("- {} -> {}", target.url, target.path.display());
    }
    println!(
        "Dry run summary: {} file(s) in {}.",
        plan.targets.len(),
        harvester.config().output_dir.display()
    );
    println!("Dry run - no files downloaded");
    Ok(())
}
