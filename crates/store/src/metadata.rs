//! Entity metadata lookup
//!
//! The target environment assigns every entity a numeric object type code.
//! `MetadataSource` is the seam through which that code is looked up.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors raised by metadata lookups
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The entity is not known to the target environment
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    /// The metadata source could not be read
    #[error("Metadata unavailable: {0}")]
    Unavailable(String),
}

/// Source of environment-specific object type codes
pub trait MetadataSource {
    /// Object type code for an entity logical name
    fn lookup_type_code(&self, entity_name: &str) -> Result<i32, MetadataError>;
}

/// Metadata backed by a fixed entity → code table
///
/// On disk the table is a JSON object: `{"account": 1, "invoice": 1090}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticMetadataSource {
    codes: HashMap<String, i32>,
}

impl StaticMetadataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration of an entity code
    pub fn with_entity(mut self, entity_name: impl Into<String>, code: i32) -> Self {
        self.codes.insert(entity_name.into(), code);
        self
    }

    /// Load the table from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MetadataError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| MetadataError::Unavailable(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| MetadataError::Unavailable(format!("{}: {}", path.display(), e)))
    }

    /// Number of known entities
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl MetadataSource for StaticMetadataSource {
    fn lookup_type_code(&self, entity_name: &str) -> Result<i32, MetadataError> {
        self.codes
            .get(entity_name)
            .copied()
            .ok_or_else(|| MetadataError::UnknownEntity(entity_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lookup() {
        let source = StaticMetadataSource::new().with_entity("account", 1);
        assert_eq!(source.lookup_type_code("account").unwrap(), 1);
        assert!(matches!(
            source.lookup_type_code("Account"),
            Err(MetadataError::UnknownEntity(_))
        ));
    }

    #[test]
    fn test_from_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("metadata.json");
        std::fs::write(&path, r#"{"account": 1, "invoice": 1090}"#).unwrap();

        let source = StaticMetadataSource::from_json_file(&path).unwrap();
        assert_eq!(source.len(), 2);
        assert_eq!(source.lookup_type_code("invoice").unwrap(), 1090);
    }

    #[test]
    fn test_from_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = StaticMetadataSource::from_json_file(dir.path().join("nope.json"));
        assert!(matches!(result, Err(MetadataError::Unavailable(_))));
    }
}
