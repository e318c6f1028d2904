//! Export command - Write stored templates to a directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use template_store::export_templates;

use super::{load_settings, open_store, RunStatus, UsageError};

#[derive(Args)]
pub struct ExportArgs {
    /// Directory of the template store
    store: PathBuf,

    /// Directory the templates are written to
    target: PathBuf,

    /// Sync settings file
    #[arg(long)]
    config: Option<PathBuf>,
}

pub async fn execute(args: ExportArgs) -> Result<RunStatus> {
    let settings = load_settings(args.config.as_deref())?;

    if !args.store.is_dir() {
        return Err(UsageError(format!("Template store not found: {}", args.store.display())).into());
    }
    let store = open_store(&args.store)?;

    let target = args.target;
    let report = tokio::task::spawn_blocking(move || export_templates(&store, &target, &settings.export))
        .await
        .context("Export task failed")?
        .context("Export aborted")?;

    println!(
        "Exported {} templates: {} skipped, {} failed",
        report.written.len(),
        report.skipped.len(),
        report.failed.len()
    );
    for failure in &report.failed {
        println!("  failed: {}: {}", failure.path.display(), failure.message);
    }

    Ok(if report.is_success() {
        RunStatus::Completed
    } else {
        RunStatus::Incomplete
    })
}
