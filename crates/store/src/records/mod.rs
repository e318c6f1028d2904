//! Record storage abstraction
//!
//! This module defines the `RecordStore` trait through which existing templates
//! are queried and new or changed templates are persisted. Implementations can
//! front a remote entity store; two local backends are provided.

mod record;
mod memory;
mod file;

pub use record::{fields, RecordQuery, TemplateId, TemplateRecord, TEMPLATE_ENTITY};
pub use memory::{MemoryRecordStore, StoreCall};
pub use file::FileRecordStore;

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Update of a record that does not exist
    #[error("Record not found: {0}")]
    RecordNotFound(TemplateId),

    /// Update without an identity
    #[error("Record '{0}' has no identity")]
    MissingIdentity(String),

    /// Create with an identity that is already taken
    #[error("Record already exists: {0}")]
    AlreadyExists(TemplateId),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),

    /// Internal storage error
    #[error("Internal storage error: {0}")]
    InternalError(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::SerializationError(err.to_string())
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for record storage backends
///
/// Methods take `&self`; backends use interior mutability.
pub trait RecordStore: Send + Sync {
    /// Return every record of the queried type, projected to the queried columns
    fn query(&self, query: &RecordQuery) -> StorageResult<Vec<TemplateRecord>>;

    /// Persist a new record and return its identity
    ///
    /// A record without an identity is assigned a fresh one.
    fn create(&self, record: TemplateRecord) -> StorageResult<TemplateId>;

    /// Replace an existing record, matched by identity
    fn update(&self, record: TemplateRecord) -> StorageResult<()>;
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StorageError {
    StorageError::InternalError("store lock poisoned".to_string())
}
