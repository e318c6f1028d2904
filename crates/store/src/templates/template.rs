//! Document template model
//!
//! A `DocumentTemplate` is built either from a file on disk or from a stored
//! record. For word-processing templates the entity binding is derived from the
//! package content every time the content is loaded.

use super::{TemplateError, TemplateResult};
use crate::docx::{extract_binding, CodeRewriter, EntityBinding, PartChanges};
use crate::records::{TemplateId, TemplateRecord, TEMPLATE_ENTITY};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Kind of office document a template holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    /// Excel workbook (`.xlsx`)
    Spreadsheet,
    /// Word document (`.docx`)
    WordProcessing,
}

impl DocumentKind {
    /// All kinds, in import processing order
    pub const IMPORT_ORDER: [DocumentKind; 2] = [DocumentKind::WordProcessing, DocumentKind::Spreadsheet];

    /// File extension for this kind (without the dot)
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Spreadsheet => "xlsx",
            DocumentKind::WordProcessing => "docx",
        }
    }

    /// Kind for a file extension, ignoring case
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.trim_start_matches('.');
        [DocumentKind::Spreadsheet, DocumentKind::WordProcessing]
            .into_iter()
            .find(|kind| kind.extension().eq_ignore_ascii_case(extension))
    }

    /// Kind for a path, from its extension
    pub fn from_path(path: &Path) -> TemplateResult<Self> {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        Self::from_extension(extension)
            .ok_or_else(|| TemplateError::UnsupportedFormat(path.display().to_string()))
    }

    /// Human-readable label used in progress messages
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Spreadsheet => "Excel",
            DocumentKind::WordProcessing => "Word",
        }
    }
}

/// A document template and the entity binding derived from its content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTemplate {
    id: Option<TemplateId>,
    name: String,
    kind: DocumentKind,
    content: Vec<u8>,
    associated_entity: Option<String>,
    binding: Option<EntityBinding>,
}

impl DocumentTemplate {
    /// Build a new template from a `.docx` or `.xlsx` file
    pub fn from_file(path: impl AsRef<Path>) -> TemplateResult<Self> {
        let path = path.as_ref();
        let (name, kind, content) = read_template_file(path)?;
        Self::from_bytes(name, kind, content)
    }

    /// Build a new template from in-memory package bytes
    pub fn from_bytes(name: impl Into<String>, kind: DocumentKind, content: Vec<u8>) -> TemplateResult<Self> {
        let mut template = Self {
            id: None,
            name: name.into(),
            kind,
            content: Vec::new(),
            associated_entity: None,
            binding: None,
        };
        template.set_content(content)?;
        Ok(template)
    }

    /// Rebuild a template from a stored record, keeping its identity
    pub fn from_record(record: &TemplateRecord) -> TemplateResult<Self> {
        if record.entity != TEMPLATE_ENTITY {
            return Err(TemplateError::InvalidRecordType {
                expected: TEMPLATE_ENTITY.to_string(),
                found: record.entity.clone(),
            });
        }

        let content = STANDARD.decode(record.content.as_bytes())?;
        let binding = match record.document_type {
            DocumentKind::WordProcessing => extract_binding(&content)?,
            DocumentKind::Spreadsheet => None,
        };

        Ok(Self {
            id: record.id,
            name: record.name.clone(),
            kind: record.document_type,
            content,
            associated_entity: record.associated_entity.clone(),
            binding,
        })
    }

    /// Replace name, kind and content with those of a file on disk
    ///
    /// The identity is kept. Nothing changes if the file cannot be loaded.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> TemplateResult<()> {
        let (name, kind, content) = read_template_file(path.as_ref())?;
        let binding = match kind {
            DocumentKind::WordProcessing => extract_binding(&content)?,
            DocumentKind::Spreadsheet => None,
        };

        self.name = name;
        self.kind = kind;
        self.content = content;
        self.apply_binding(binding);
        Ok(())
    }

    fn set_content(&mut self, content: Vec<u8>) -> TemplateResult<()> {
        let binding = match self.kind {
            DocumentKind::WordProcessing => extract_binding(&content)?,
            DocumentKind::Spreadsheet => None,
        };
        self.content = content;
        self.apply_binding(binding);
        Ok(())
    }

    fn apply_binding(&mut self, binding: Option<EntityBinding>) {
        if self.kind == DocumentKind::WordProcessing {
            self.associated_entity = binding.as_ref().map(|b| b.entity_name.clone());
        }
        self.binding = binding;
    }

    /// Rewrite the embedded object type code to `target_code`
    ///
    /// Returns `None` without touching the content for spreadsheets, unbound
    /// documents, and documents already carrying `target_code`.
    pub fn normalize_type_code(
        &mut self,
        target_code: i32,
        rewriter: &dyn CodeRewriter,
    ) -> TemplateResult<Option<PartChanges>> {
        if self.kind != DocumentKind::WordProcessing {
            return Ok(None);
        }
        let Some(binding) = self.binding.as_mut() else {
            return Ok(None);
        };
        if binding.type_code == target_code {
            return Ok(None);
        }

        let (content, changes) = rewriter
            .rewrite_code(&self.content, &binding.entity_name, binding.type_code, target_code)?
            .into_parts();
        self.content = content;
        binding.type_code = target_code;
        Ok(Some(changes))
    }

    /// Record shape for the record store
    pub fn to_record(&self) -> TemplateRecord {
        TemplateRecord {
            entity: TEMPLATE_ENTITY.to_string(),
            id: self.id,
            name: self.name.clone(),
            document_type: self.kind,
            associated_entity: self.associated_entity.clone(),
            content: STANDARD.encode(&self.content),
        }
    }

    /// Write the package to `<directory>/<name>.<extension>`, overwriting
    pub fn save_file(&self, directory: impl AsRef<Path>) -> TemplateResult<PathBuf> {
        let directory = directory.as_ref();
        let path = self.file_path(directory)?;
        fs::create_dir_all(directory)?;
        fs::write(&path, &self.content)?;
        Ok(path)
    }

    /// Path this template is exported to inside `directory`
    ///
    /// The name must stay a single file name: separators, `..`, and root or
    /// drive prefixes are rejected with `InvalidName`.
    pub fn file_path(&self, directory: impl AsRef<Path>) -> TemplateResult<PathBuf> {
        let file_name = format!("{}.{}", self.name, self.kind.extension());
        let mut components = Path::new(&file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(directory.as_ref().join(file_name)),
            _ => Err(TemplateError::InvalidName(self.name.clone())),
        }
    }

    pub fn id(&self) -> Option<TemplateId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Entity binding found in the package, word-processing templates only
    pub fn binding(&self) -> Option<&EntityBinding> {
        self.binding.as_ref()
    }

    /// Logical name of the entity the package is bound to
    pub fn bound_entity_name(&self) -> Option<&str> {
        self.binding.as_ref().map(|b| b.entity_name.as_str())
    }

    /// Embedded object type code, 0 when unbound
    pub fn object_type_code(&self) -> i32 {
        self.binding.as_ref().map(|b| b.type_code).unwrap_or(0)
    }

    /// Entity association carried to the record store
    pub fn associated_entity(&self) -> Option<&str> {
        self.associated_entity.as_deref()
    }
}

/// Template name for a path: the file name without its extension
pub fn template_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn read_template_file(path: &Path) -> TemplateResult<(String, DocumentKind, Vec<u8>)> {
    let kind = DocumentKind::from_path(path)?;
    let content = fs::read(path)?;
    Ok((template_name(path), kind, content))
}
