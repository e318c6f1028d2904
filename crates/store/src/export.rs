//! Writing stored templates back to a directory

use crate::reconciler::FileFailure;
use crate::records::{RecordQuery, RecordStore};
use crate::settings::ExportSettings;
use crate::templates::{DocumentTemplate, TemplateResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Summary of an export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Files written
    pub written: Vec<PathBuf>,
    /// Existing files left alone because overwriting is disabled
    pub skipped: Vec<PathBuf>,
    /// Records that could not be exported
    pub failed: Vec<FileFailure>,
}

impl ExportReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Write every stored template to `<directory>/<name>.<extension>`
///
/// Records that cannot be decoded, or whose name is not a plain file name, are
/// reported and skipped. Failing to query the store or to create the directory
/// aborts the export.
pub fn export_templates<S: RecordStore>(
    store: &S,
    directory: &Path,
    settings: &ExportSettings,
) -> TemplateResult<ExportReport> {
    let records = store.query(&RecordQuery::templates())?;
    tracing::info!("Exporting {} templates to {}", records.len(), directory.display());
    fs::create_dir_all(directory)?;

    let mut report = ExportReport::default();
    for record in &records {
        let prepared = DocumentTemplate::from_record(record)
            .and_then(|template| template.file_path(directory).map(|path| (template, path)));
        let (template, path) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::error!("Failed to export template '{}': {}", record.name, e);
                report.failed.push(FileFailure {
                    path: PathBuf::from(&record.name),
                    message: e.to_string(),
                });
                continue;
            }
        };

        if path.exists() && !settings.overwrite {
            tracing::warn!("{} already exists, skipping", path.display());
            report.skipped.push(path);
            continue;
        }

        match template.save_file(directory) {
            Ok(path) => {
                tracing::debug!("Wrote {}", path.display());
                report.written.push(path);
            }
            Err(e) => {
                tracing::error!("Failed to write {}: {}", path.display(), e);
                report.failed.push(FileFailure {
                    path,
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}
