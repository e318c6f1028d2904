//! Directory-to-store reconciliation
//!
//! For every template file in a directory the reconciler decides whether the
//! store already holds a template of the same name (update) or not (create),
//! normalizes the embedded object type code to the target environment, and
//! persists the result. Word templates are processed before Excel templates.

use crate::docx::{CodeRewriter, TextualCodeRewriter};
use crate::metadata::MetadataSource;
use crate::records::{RecordQuery, RecordStore, StorageError, TemplateId, TemplateRecord};
use crate::resolver::TypeCodeResolver;
use crate::settings::ImportSettings;
use crate::templates::{
    list_template_files, template_name, DocumentKind, DocumentTemplate, TemplateError, TemplateResult,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag used to stop a run between files
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Stored templates indexed by name
#[derive(Debug, Clone, Default)]
pub struct ExistingTemplates {
    by_name: HashMap<String, TemplateRecord>,
}

impl ExistingTemplates {
    /// Index records by name; on duplicate names the first record wins
    pub fn from_records(records: Vec<TemplateRecord>) -> Self {
        let mut by_name = HashMap::with_capacity(records.len());
        for record in records {
            if by_name.contains_key(&record.name) {
                tracing::warn!(
                    "Multiple stored templates are named '{}'; using the first one",
                    record.name
                );
                continue;
            }
            by_name.insert(record.name.clone(), record);
        }
        Self { by_name }
    }

    /// Stored record with exactly this name
    pub fn get(&self, name: &str) -> Option<&TemplateRecord> {
        self.by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// What happened to a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Created(TemplateId),
    Updated(TemplateId),
}

/// A file that could not be imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Summary of an import run
#[derive(Debug, Clone)]
pub struct ImportReport {
    /// Number of templates found in the store before the run
    pub existing_records: usize,
    /// Files imported as new templates
    pub created: Vec<(PathBuf, TemplateId)>,
    /// Files that replaced an existing template
    pub updated: Vec<(PathBuf, TemplateId)>,
    /// Files that failed
    pub failed: Vec<FileFailure>,
    /// The run stopped early because it was cancelled
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ImportReport {
    fn start(existing_records: usize) -> Self {
        let now = Utc::now();
        Self {
            existing_records,
            created: Vec::new(),
            updated: Vec::new(),
            failed: Vec::new(),
            cancelled: false,
            started_at: now,
            finished_at: now,
        }
    }

    /// Every file succeeded and the run was not cancelled
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && !self.cancelled
    }

    /// Number of files processed, successfully or not
    pub fn processed(&self) -> usize {
        self.created.len() + self.updated.len() + self.failed.len()
    }

    /// Wall-clock duration of the run
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Imports a template directory into a record store
pub struct Reconciler<'a, S: RecordStore, M: MetadataSource> {
    store: &'a S,
    resolver: TypeCodeResolver<M>,
    rewriter: Box<dyn CodeRewriter + 'a>,
    settings: ImportSettings,
    cancel: CancelFlag,
}

impl<'a, S: RecordStore, M: MetadataSource> Reconciler<'a, S, M> {
    /// Create a reconciler with a fresh resolver cache
    pub fn new(store: &'a S, metadata: M) -> Self {
        Self {
            store,
            resolver: TypeCodeResolver::new(metadata),
            rewriter: Box::new(TextualCodeRewriter::new()),
            settings: ImportSettings::default(),
            cancel: CancelFlag::new(),
        }
    }

    pub fn with_settings(mut self, settings: ImportSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Substitute the package rewriter
    pub fn with_rewriter(mut self, rewriter: impl CodeRewriter + 'a) -> Self {
        self.rewriter = Box::new(rewriter);
        self
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// The run's type-code resolver
    pub fn resolver(&self) -> &TypeCodeResolver<M> {
        &self.resolver
    }

    /// Snapshot of the templates currently in the store
    pub fn load_existing(&self) -> TemplateResult<ExistingTemplates> {
        let records = self.store.query(&RecordQuery::templates())?;
        Ok(ExistingTemplates::from_records(records))
    }

    /// Import every Word, then every Excel template in `directory`
    ///
    /// Per-file failures are collected in the report; the run stops at the first
    /// one only when `fail_fast` is set. Failing to query the store or to list the
    /// directory aborts the run.
    pub fn import_directory(&mut self, directory: &Path) -> TemplateResult<ImportReport> {
        let existing = self.load_existing()?;
        tracing::info!("Found {} existing templates in target environment", existing.len());
        tracing::info!("Loading templates from: {}", directory.display());

        let mut report = ImportReport::start(existing.len());

        'kinds: for kind in DocumentKind::IMPORT_ORDER {
            let paths = list_template_files(directory, kind, self.settings.skip_lock_files)?;
            tracing::info!("Found {} {} templates in directory", paths.len(), kind.label());

            for path in paths {
                if self.cancel.is_cancelled() {
                    tracing::warn!("Import cancelled before {}", path.display());
                    report.cancelled = true;
                    break 'kinds;
                }

                match self.process_file(&path, &existing) {
                    Ok(FileOutcome::Created(id)) => report.created.push((path, id)),
                    Ok(FileOutcome::Updated(id)) => report.updated.push((path, id)),
                    Err(e) => {
                        if e.is_malformed_binding() {
                            tracing::error!(
                                "{} has a malformed entity binding and was not imported: {}",
                                path.display(),
                                e
                            );
                        } else {
                            tracing::error!("Failed to import {}: {}", path.display(), e);
                        }
                        report.failed.push(FileFailure {
                            path,
                            message: e.to_string(),
                        });
                        if self.settings.fail_fast {
                            break 'kinds;
                        }
                    }
                }
            }
        }

        report.finished_at = Utc::now();
        Ok(report)
    }

    /// Create or update the stored template for one file
    pub fn process_file(&mut self, path: &Path, existing: &ExistingTemplates) -> TemplateResult<FileOutcome> {
        let name = template_name(path);

        match existing.get(&name) {
            None => {
                tracing::info!("Adding {} as a new template", path.display());
                let mut template = DocumentTemplate::from_file(path)?;
                self.normalize(&mut template)?;

                let id = self.store.create(template.to_record())?;
                Ok(FileOutcome::Created(id))
            }
            Some(record) => {
                tracing::info!("Updating existing template with {}", path.display());
                let mut template = DocumentTemplate::from_record(record)?;
                template.load_file(path)?;
                self.normalize(&mut template)?;

                let id = template
                    .id()
                    .ok_or_else(|| TemplateError::Storage(StorageError::MissingIdentity(name)))?;
                self.store.update(template.to_record())?;
                Ok(FileOutcome::Updated(id))
            }
        }
    }

    /// Bring a Word template's object type code in line with the target environment
    fn normalize(&mut self, template: &mut DocumentTemplate) -> TemplateResult<()> {
        if template.kind() != DocumentKind::WordProcessing {
            return Ok(());
        }

        let Some(entity) = template.bound_entity_name().map(str::to_string) else {
            tracing::warn!(
                "Template '{}' has no entity binding; content left unchanged",
                template.name()
            );
            return Ok(());
        };

        let target_code = self.resolver.resolve(&entity)?;
        if target_code == template.object_type_code() {
            return Ok(());
        }

        tracing::info!(
            "Updating document ObjectTypeCode of '{}' from {} to {}",
            template.name(),
            template.object_type_code(),
            target_code
        );
        if let Some(changes) = template.normalize_type_code(target_code, self.rewriter.as_ref())? {
            tracing::debug!(
                "Rewrote {} part(s), {} part(s) without the old code",
                changes.modified_parts.len(),
                changes.untouched_parts.len()
            );
        }
        Ok(())
    }
}
