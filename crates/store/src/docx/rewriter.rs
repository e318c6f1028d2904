//! Object type code rewriting
//!
//! A template authored in one environment embeds that environment's object type
//! code in the binding namespace (`.../account/1/`). Importing it elsewhere
//! requires replacing `<entity>/<old>/` with `<entity>/<new>/` in the main
//! document, its headers and footers, and the custom XML properties parts.
//!
//! The substitution is literal text replacement, not XML-aware. A part that does
//! not contain the old pattern is left as it is, even if other parts change.

use crate::docx::error::{DocxError, DocxResult};
use crate::docx::parts::PackageParts;
use crate::docx::reader::DocxReader;
use crate::docx::writer::PackageWriter;
use std::collections::HashMap;
use std::io::Cursor;

/// Result of a rewrite pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// The rewritten package (the original bytes when nothing matched)
    pub content: Vec<u8>,
    /// Parts whose text was changed, in rewrite order
    pub modified_parts: Vec<String>,
    /// Targeted parts left as they were (no old pattern, or not decodable as text)
    pub untouched_parts: Vec<String>,
}

impl RewriteOutcome {
    /// Whether any part was changed
    pub fn is_modified(&self) -> bool {
        !self.modified_parts.is_empty()
    }

    /// Separate the package bytes from the per-part report without copying
    pub fn into_parts(self) -> (Vec<u8>, PartChanges) {
        (
            self.content,
            PartChanges {
                modified_parts: self.modified_parts,
                untouched_parts: self.untouched_parts,
            },
        )
    }
}

/// Which targeted parts a rewrite changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartChanges {
    pub modified_parts: Vec<String>,
    pub untouched_parts: Vec<String>,
}

impl PartChanges {
    pub fn is_modified(&self) -> bool {
        !self.modified_parts.is_empty()
    }
}

/// Rewrites the object type code embedded in a WordprocessingML package
pub trait CodeRewriter {
    fn rewrite_code(
        &self,
        package: &[u8],
        entity_name: &str,
        old_code: i32,
        new_code: i32,
    ) -> DocxResult<RewriteOutcome>;
}

/// Literal `<entity>/<code>/` substitution across the binding-relevant parts
#[derive(Debug, Clone, Copy, Default)]
pub struct TextualCodeRewriter;

impl TextualCodeRewriter {
    pub fn new() -> Self {
        Self
    }
}

/// The text fragment identifying an entity binding with a given code
pub fn code_pattern(entity_name: &str, code: i32) -> String {
    format!("{}/{}/", entity_name, code)
}

impl CodeRewriter for TextualCodeRewriter {
    fn rewrite_code(
        &self,
        package: &[u8],
        entity_name: &str,
        old_code: i32,
        new_code: i32,
    ) -> DocxResult<RewriteOutcome> {
        let mut reader = DocxReader::new(Cursor::new(package))?;
        let parts = PackageParts::discover(&mut reader)?;

        let old_pattern = code_pattern(entity_name, old_code);
        let new_pattern = code_pattern(entity_name, new_code);

        let mut replacements = HashMap::new();
        let mut modified_parts = Vec::new();
        let mut untouched_parts = Vec::new();

        for part in parts.rewrite_targets() {
            let part_text = match reader.read_part_as_text(part) {
                Ok(part_text) => part_text,
                Err(e @ (DocxError::Utf8 { .. } | DocxError::Utf16 { .. })) => {
                    tracing::warn!("Leaving {} unchanged: {}", part, e);
                    untouched_parts.push(part.to_string());
                    continue;
                }
                Err(e) => return Err(e),
            };

            if old_code != new_code && part_text.text.contains(&old_pattern) {
                tracing::debug!("Rewriting {} -> {} in {}", old_pattern, new_pattern, part);
                let rewritten = part_text.text.replace(&old_pattern, &new_pattern);
                replacements.insert(part.to_string(), part_text.encode(&rewritten));
                modified_parts.push(part.to_string());
            } else {
                untouched_parts.push(part.to_string());
            }
        }

        let content = if replacements.is_empty() {
            package.to_vec()
        } else {
            PackageWriter::new(Cursor::new(Vec::new()))
                .copy_with_replacements(&mut reader, &replacements)?
                .into_inner()
        };

        Ok(RewriteOutcome {
            content,
            modified_parts,
            untouched_parts,
        })
    }
}
