//! In-memory record store implementation.
//!
//! `MemoryRecordStore` keeps records in insertion order behind an `RwLock` and
//! logs every call made against it, which makes it the store of choice for
//! tests and dry runs. Nothing is persisted.

use std::sync::{Mutex, RwLock};

use super::{poisoned, RecordQuery, RecordStore, StorageError, StorageResult, TemplateId, TemplateRecord};

/// A call observed by [`MemoryRecordStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Query(String),
    Create(TemplateId),
    Update(TemplateId),
}

/// In-memory implementation of `RecordStore`
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<Vec<TemplateRecord>>,
    calls: Mutex<Vec<StoreCall>>,
}

impl MemoryRecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with records; records without identity get one
    pub fn with_records(records: impl IntoIterator<Item = TemplateRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|mut r| {
                r.id.get_or_insert_with(TemplateId::new);
                r
            })
            .collect();

        Self {
            records: RwLock::new(records),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of all stored records
    pub fn records(&self) -> Vec<TemplateRecord> {
        self.records.read().map(|r| r.clone()).unwrap_or_default()
    }

    /// Look up a record by identity
    pub fn get(&self, id: TemplateId) -> Option<TemplateRecord> {
        self.records
            .read()
            .ok()
            .and_then(|records| records.iter().find(|r| r.id == Some(id)).cloned())
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn log(&self, call: StoreCall) -> StorageResult<()> {
        self.calls.lock().map_err(poisoned)?.push(call);
        Ok(())
    }
}

impl RecordStore for MemoryRecordStore {
    fn query(&self, query: &RecordQuery) -> StorageResult<Vec<TemplateRecord>> {
        self.log(StoreCall::Query(query.entity.clone()))?;
        let records = self.records.read().map_err(poisoned)?;

        Ok(records
            .iter()
            .filter(|r| r.entity == query.entity)
            .map(|r| r.project(query))
            .collect())
    }

    fn create(&self, mut record: TemplateRecord) -> StorageResult<TemplateId> {
        let id = *record.id.get_or_insert_with(TemplateId::new);
        let mut records = self.records.write().map_err(poisoned)?;

        if records.iter().any(|r| r.id == Some(id)) {
            return Err(StorageError::AlreadyExists(id));
        }

        records.push(record);
        drop(records);
        self.log(StoreCall::Create(id))?;
        Ok(id)
    }

    fn update(&self, record: TemplateRecord) -> StorageResult<()> {
        let id = record
            .id
            .ok_or_else(|| StorageError::MissingIdentity(record.name.clone()))?;
        let mut records = self.records.write().map_err(poisoned)?;

        let slot = records
            .iter_mut()
            .find(|r| r.id == Some(id))
            .ok_or(StorageError::RecordNotFound(id))?;
        *slot = record;

        drop(records);
        self.log(StoreCall::Update(id))?;
        Ok(())
    }
}
