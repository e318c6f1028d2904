//! Template store - Document template import, export, and reconciliation
//!
//! This crate handles the entity binding embedded in Word templates, rewriting
//! of environment-specific object type codes, the template record model,
//! record stores, and the reconciliation of a template directory against a
//! store (create new templates, update existing ones by name).

mod error;
mod settings;
mod metadata;
mod resolver;
mod reconciler;
mod export;
pub mod docx;
pub mod records;
pub mod templates;

pub use error::*;
pub use settings::*;
pub use metadata::*;
pub use resolver::*;
pub use reconciler::*;
pub use export::*;

// Re-export DOCX binding functionality
pub use docx::{
    extract_binding, CodeRewriter, DocxError, DocxResult, EntityBinding, RewriteOutcome,
    TextualCodeRewriter,
};

// Re-export record storage
pub use records::{
    FileRecordStore, MemoryRecordStore, RecordQuery, RecordStore, StorageError, StorageResult,
    TemplateId, TemplateRecord,
};

// Re-export template functionality
pub use templates::{
    list_template_files, template_name, DocumentKind, DocumentTemplate, TemplateError,
    TemplateResult,
};
