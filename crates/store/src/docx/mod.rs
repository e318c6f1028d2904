//! DOCX package access for template bindings
//!
//! A DOCX file is a ZIP archive of XML parts connected by relationship parts:
//! - `[Content_Types].xml` - Content type definitions
//! - `_rels/.rels` - Root relationships (points at the main document)
//! - `word/document.xml` - Main document content
//! - `word/_rels/document.xml.rels` - Main document relationships
//! - `word/header*.xml`, `word/footer*.xml` - Headers and footers
//! - `customXml/item*.xml` - Custom XML data parts
//! - `customXml/itemProps*.xml` - Custom XML properties (schema references)
//!
//! This module only deals with what template import needs: finding the entity
//! binding declared in the custom XML properties and rewriting its object type
//! code. Everything else in the package is carried through untouched.

mod error;
mod reader;
mod relationships;
mod parts;
mod binding;
mod writer;
mod rewriter;
mod text;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{DocxError, DocxResult};
pub use reader::{DocxReader, XmlParser};
pub use relationships::{rels_path_for, resolve_target, Relationship, Relationships, TargetMode};
pub use parts::PackageParts;
pub use binding::{extract_binding, find_binding, EntityBinding};
pub use writer::PackageWriter;
pub use rewriter::{code_pattern, CodeRewriter, PartChanges, RewriteOutcome, TextualCodeRewriter};
pub use text::{PartText, TextEncoding};

/// Namespace root that marks a document template entity binding
pub const TEMPLATE_URI_ROOT: &str = "urn:microsoft-crm/document-template/";

/// Custom XML data properties namespace (holds `schemaRef` elements)
pub const CUSTOM_XML_NAMESPACE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/customXml";

/// Relationship types used to reach binding-relevant parts
pub mod relationship_types {
    pub const DOCUMENT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const HEADER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
    pub const FOOTER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
    pub const HYPERLINK: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
    pub const CUSTOM_XML: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/customXml";
    pub const CUSTOM_XML_PROPS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/customXmlProps";
}
