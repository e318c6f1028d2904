//! File-based record store implementation.
//!
//! # Directory Structure
//!
//! ```text
//! store/
//! ├── 0f6c0b1e-....json    # one record per file, named by identity
//! └── 5a2d93c4-....json
//! ```
//!
//! Records are written as pretty JSON so a store directory can be inspected
//! and diffed by hand. Files that do not parse as records are skipped with a
//! warning when querying.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{poisoned, RecordQuery, RecordStore, StorageError, StorageResult, TemplateId, TemplateRecord};

/// File-based implementation of `RecordStore`
#[derive(Debug)]
pub struct FileRecordStore {
    base_path: PathBuf,
    /// Serializes writers within this process
    write_lock: Mutex<()>,
}

impl FileRecordStore {
    /// Open a store rooted at `base_path`, creating the directory if needed
    pub fn new(base_path: impl AsRef<Path>) -> StorageResult<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;

        Ok(Self {
            base_path,
            write_lock: Mutex::new(()),
        })
    }

    /// Directory holding the record files
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn record_path(&self, id: TemplateId) -> PathBuf {
        self.base_path.join(format!("{}.json", id))
    }

    fn write_record(&self, path: &Path, record: &TemplateRecord) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(record)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    fn load_all(&self) -> StorageResult<Vec<TemplateRecord>> {
        let mut paths: Vec<PathBuf> = fs::read_dir(&self.base_path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().map(|e| e == "json").unwrap_or(false))
            .collect();
        paths.sort();

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            let content = fs::read_to_string(&path)?;
            match serde_json::from_str::<TemplateRecord>(&content) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping unreadable record {}: {}", path.display(), e),
            }
        }
        Ok(records)
    }
}

impl RecordStore for FileRecordStore {
    fn query(&self, query: &RecordQuery) -> StorageResult<Vec<TemplateRecord>> {
        Ok(self
            .load_all()?
            .iter()
            .filter(|r| r.entity == query.entity)
            .map(|r| r.project(query))
            .collect())
    }

    fn create(&self, mut record: TemplateRecord) -> StorageResult<TemplateId> {
        let _guard = self.write_lock.lock().map_err(poisoned)?;

        let id = *record.id.get_or_insert_with(TemplateId::new);
        let path = self.record_path(id);
        if path.exists() {
            return Err(StorageError::AlreadyExists(id));
        }

        self.write_record(&path, &record)?;
        Ok(id)
    }

    fn update(&self, record: TemplateRecord) -> StorageResult<()> {
        let _guard = self.write_lock.lock().map_err(poisoned)?;

        let id = record
            .id
            .ok_or_else(|| StorageError::MissingIdentity(record.name.clone()))?;
        let path = self.record_path(id);
        if !path.exists() {
            return Err(StorageError::RecordNotFound(id));
        }

        self.write_record(&path, &record)
    }
}
