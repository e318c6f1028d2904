//! Import command - Reconcile a template directory with the store.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use template_store::{CancelFlag, ImportReport, Reconciler, StaticMetadataSource};

use super::{load_settings, open_store, RunStatus, UsageError};

/// Entity type code table looked up inside the store directory by default
pub const METADATA_FILE: &str = "metadata.json";

#[derive(Args)]
pub struct ImportArgs {
    /// Directory of the template store
    store: PathBuf,

    /// Directory containing the .docx and .xlsx templates to import
    templates: PathBuf,

    /// Entity type code table, a JSON object of entity name to code
    /// [default: <STORE>/metadata.json]
    #[arg(long)]
    metadata: Option<PathBuf>,

    /// Sync settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop at the first template that fails
    #[arg(long)]
    fail_fast: bool,
}

pub async fn execute(args: ImportArgs) -> Result<RunStatus> {
    let mut settings = load_settings(args.config.as_deref())?;
    if args.fail_fast {
        settings.import.fail_fast = true;
    }

    if !args.templates.is_dir() {
        return Err(UsageError(format!("Template directory not found: {}", args.templates.display())).into());
    }

    let metadata_path = args.metadata.unwrap_or_else(|| args.store.join(METADATA_FILE));
    let metadata = StaticMetadataSource::from_json_file(&metadata_path).map_err(|e| UsageError(e.to_string()))?;
    info!("Loaded {} entity type codes from {}", metadata.len(), metadata_path.display());

    let store = open_store(&args.store)?;

    let cancel = CancelFlag::new();
    let watcher = watch_for_interrupt(cancel.clone());

    let template_dir = args.templates;
    let result = tokio::task::spawn_blocking(move || {
        Reconciler::new(&store, metadata)
            .with_settings(settings.import)
            .with_cancel_flag(cancel)
            .import_directory(&template_dir)
    })
    .await;
    watcher.abort();

    let report = result.context("Import task failed")?.context("Import aborted")?;
    print_summary(&report);

    Ok(if report.is_success() {
        RunStatus::Completed
    } else {
        RunStatus::Incomplete
    })
}

/// Trip `cancel` on Ctrl-C; the run stops before its next template
fn watch_for_interrupt(cancel: CancelFlag) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current template");
            cancel.cancel();
        }
    })
}

fn print_summary(report: &ImportReport) {
    println!(
        "Imported {} templates: {} created, {} updated, {} failed ({:.1}s)",
        report.processed(),
        report.created.len(),
        report.updated.len(),
        report.failed.len(),
        report.duration().num_milliseconds() as f64 / 1000.0
    );

    for failure in &report.failed {
        println!("  failed: {}: {}", failure.path.display(), failure.message);
    }

    if report.cancelled {
        println!("Import cancelled before all templates were processed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use template_store::{FileRecordStore, RecordQuery, RecordStore};
    use tempfile::TempDir;

    fn args(store: &TempDir, templates: &TempDir) -> ImportArgs {
        ImportArgs {
            store: store.path().to_path_buf(),
            templates: templates.path().to_path_buf(),
            metadata: None,
            config: None,
            fail_fast: false,
        }
    }

    #[tokio::test]
    async fn test_import_directory_into_store() {
        let store = TempDir::new().unwrap();
        let templates = TempDir::new().unwrap();
        fs::write(store.path().join(METADATA_FILE), r#"{"account": 1}"#).unwrap();
        fs::write(templates.path().join("Pipeline.xlsx"), b"workbook").unwrap();

        let status = execute(args(&store, &templates)).await.unwrap();
        assert_eq!(status, RunStatus::Completed);

        let records = FileRecordStore::new(store.path())
            .unwrap()
            .query(&RecordQuery::templates())
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Pipeline");
    }

    #[tokio::test]
    async fn test_failed_template_gives_incomplete_run() {
        let store = TempDir::new().unwrap();
        let templates = TempDir::new().unwrap();
        fs::write(store.path().join(METADATA_FILE), "{}").unwrap();
        fs::write(templates.path().join("Broken.docx"), b"not a package").unwrap();

        let status = execute(args(&store, &templates)).await.unwrap();
        assert_eq!(status, RunStatus::Incomplete);
    }

    #[tokio::test]
    async fn test_missing_metadata_is_a_usage_error() {
        let store = TempDir::new().unwrap();
        let templates = TempDir::new().unwrap();

        let err = execute(args(&store, &templates)).await.unwrap_err();
        assert!(err.is::<UsageError>());
    }
}
