//! Typed shape of a stored document template record

use crate::templates::DocumentKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Logical name of the document template record type
pub const TEMPLATE_ENTITY: &str = "documenttemplate";

/// Column names of the document template record type
pub mod fields {
    pub const ID: &str = "documenttemplateid";
    pub const NAME: &str = "name";
    pub const DOCUMENT_TYPE: &str = "documenttype";
    pub const ASSOCIATED_ENTITY: &str = "associatedentitytypecode";
    pub const CONTENT: &str = "content";

    /// Every template column
    pub const ALL: [&str; 5] = [ID, NAME, DOCUMENT_TYPE, ASSOCIATED_ENTITY, CONTENT];
}

/// Opaque identity of a stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub Uuid);

impl TemplateId {
    /// Generate a fresh identity
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TemplateId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A document template record as exchanged with a record store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    /// Logical record type; always [`TEMPLATE_ENTITY`] for well-formed records
    pub entity: String,
    /// Identity, absent for records not yet created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TemplateId>,
    /// Template name, the natural key when matching files to records
    pub name: String,
    /// Document kind discriminator
    pub document_type: DocumentKind,
    /// Logical name of the entity the template is associated with
    #[serde(default)]
    pub associated_entity: Option<String>,
    /// Base64 encoded package bytes
    #[serde(default)]
    pub content: String,
}

impl TemplateRecord {
    /// Copy of this record with unselected optional columns cleared
    pub fn project(&self, query: &RecordQuery) -> Self {
        let mut projected = self.clone();
        if !query.selects(fields::ASSOCIATED_ENTITY) {
            projected.associated_entity = None;
        }
        if !query.selects(fields::CONTENT) {
            projected.content.clear();
        }
        projected
    }
}

/// Record query: a record type plus the columns to return
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub entity: String,
    pub columns: Vec<String>,
}

impl RecordQuery {
    pub fn new(entity: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            entity: entity.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// All document templates with every column
    pub fn templates() -> Self {
        Self::new(TEMPLATE_ENTITY, &fields::ALL)
    }

    /// Whether a column is part of the selection
    pub fn selects(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}
