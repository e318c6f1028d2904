//! Error types for template operations

use crate::docx::DocxError;
use crate::metadata::MetadataError;
use crate::records::StorageError;
use thiserror::Error;

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Package could not be read, or its binding is malformed
    #[error("Package error: {0}")]
    Docx(#[from] DocxError),

    /// File extension is not a supported template format
    #[error("Unsupported document extension: {0}")]
    UnsupportedFormat(String),

    /// Record is not a document template
    #[error("Incorrect record type: expected '{expected}', found '{found}'")]
    InvalidRecordType { expected: String, found: String },

    /// Stored content is not valid base64
    #[error("Invalid content encoding: {0}")]
    ContentEncoding(#[from] base64::DecodeError),

    /// The target environment could not resolve an entity
    #[error("Cannot resolve object type code for '{entity}': {source}")]
    Resolution {
        entity: String,
        #[source]
        source: MetadataError,
    },

    /// Record store error
    #[error("Store error: {0}")]
    Storage(#[from] StorageError),

    /// Template name cannot be used as a file name
    #[error("Template name '{0}' is not a plain file name")]
    InvalidName(String),
}

impl TemplateError {
    /// Whether the error is a malformed entity binding inside the package
    pub fn is_malformed_binding(&self) -> bool {
        matches!(self, TemplateError::Docx(DocxError::MalformedBinding { .. }))
    }
}

/// Result type for template operations
pub type TemplateResult<T> = std::result::Result<T, TemplateError>;
