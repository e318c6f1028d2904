//! Template entity binding extraction
//!
//! Templates generated by the CRM document designer declare the entity they are
//! bound to through a schema reference in a custom XML properties part:
//!
//! ```xml
//! <ds:datastoreItem xmlns:ds="http://schemas.openxmlformats.org/officeDocument/2006/customXml">
//!   <ds:schemaRefs>
//!     <ds:schemaRef ds:uri="urn:microsoft-crm/document-template/account/1/"/>
//!   </ds:schemaRefs>
//! </ds:datastoreItem>
//! ```
//!
//! The segments after the URI root are `<entity>/<object type code>/...`.

use crate::docx::error::{DocxError, DocxResult};
use crate::docx::parts::PackageParts;
use crate::docx::reader::DocxReader;
use crate::docx::{CUSTOM_XML_NAMESPACE, TEMPLATE_URI_ROOT};
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Read, Seek};

/// Entity binding embedded in a template package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityBinding {
    /// Logical name of the bound entity (e.g., "account")
    pub entity_name: String,
    /// Object type code of the entity in the environment the template was authored in
    pub type_code: i32,
}

impl EntityBinding {
    pub fn new(entity_name: impl Into<String>, type_code: i32) -> Self {
        Self {
            entity_name: entity_name.into(),
            type_code,
        }
    }

    /// Parse a schema reference URI of the form `<root><entity>/<code>/...`
    pub fn from_uri(uri: &str) -> DocxResult<Self> {
        let malformed = |reason: &str| DocxError::MalformedBinding {
            uri: uri.to_string(),
            reason: reason.to_string(),
        };

        let rest = uri
            .strip_prefix(TEMPLATE_URI_ROOT)
            .ok_or_else(|| malformed("not a document template namespace"))?;
        let mut segments = rest.split('/');

        let entity_name = segments.next().unwrap_or_default();
        if entity_name.is_empty() {
            return Err(malformed("empty entity name"));
        }

        let code = segments.next().unwrap_or_default();
        let type_code = code
            .parse::<i32>()
            .map_err(|e| malformed(&format!("type code '{}' is not an integer: {}", code, e)))?;

        Ok(Self::new(entity_name, type_code))
    }
}

/// Extract the entity binding from a DOCX package held in memory
///
/// Returns `Ok(None)` when no custom XML properties part carries the template
/// namespace marker; that is a normal outcome for unbound documents.
pub fn extract_binding(package: &[u8]) -> DocxResult<Option<EntityBinding>> {
    let mut reader = DocxReader::new(Cursor::new(package))?;
    let parts = PackageParts::discover(&mut reader)?;
    find_binding(&mut reader, &parts)
}

/// Locate the binding among already discovered parts
///
/// The first custom XML properties part (by part name) whose text contains the
/// template URI root decides the outcome. Parts that cannot be decoded as text
/// are skipped.
pub fn find_binding<R: Read + Seek>(
    reader: &mut DocxReader<R>,
    parts: &PackageParts,
) -> DocxResult<Option<EntityBinding>> {
    for part in &parts.custom_xml_properties {
        let xml = match reader.read_part_as_string(part) {
            Ok(xml) => xml,
            Err(e @ (DocxError::Utf8 { .. } | DocxError::Utf16 { .. })) => {
                tracing::warn!("Skipping custom XML properties part {}: {}", part, e);
                continue;
            }
            Err(e) => return Err(e),
        };
        if !xml.contains(TEMPLATE_URI_ROOT) {
            continue;
        }

        tracing::debug!("Template binding marker found in {}", part);
        return match find_schema_ref(&xml)? {
            Some(uri) => EntityBinding::from_uri(&uri).map(Some),
            None => Ok(None),
        };
    }

    Ok(None)
}

/// First `customXml:schemaRef/@customXml:uri` value under the template URI root
fn find_schema_ref(xml: &str) -> DocxResult<Option<String>> {
    let mut reader = NsReader::from_str(xml);

    loop {
        let (ns, event) = reader.read_resolved_event()?;
        let in_custom_xml = is_custom_xml(&ns);

        match event {
            Event::Start(ref e) | Event::Empty(ref e)
                if in_custom_xml && e.local_name().as_ref() == b"schemaRef" =>
            {
                for attr in e.attributes() {
                    let attr = attr?;
                    let (attr_ns, local) = reader.resolve_attribute(attr.key);
                    if local.as_ref() != b"uri" || !is_custom_xml(&attr_ns) {
                        continue;
                    }

                    let value = attr.unescape_value()?;
                    if value.starts_with(TEMPLATE_URI_ROOT) {
                        return Ok(Some(value.into_owned()));
                    }
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

fn is_custom_xml(ns: &ResolveResult) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == CUSTOM_XML_NAMESPACE.as_bytes())
}
