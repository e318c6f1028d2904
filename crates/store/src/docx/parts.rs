//! Discovery of the parts that carry template bindings
//!
//! Starting from the package relationships, this locates the main document part
//! and, through its relationships, the header, footer and custom XML properties
//! parts. Only parts that actually exist in the archive are reported.

use crate::docx::error::{DocxError, DocxResult};
use crate::docx::reader::{DocxReader, ROOT_RELS_PART};
use crate::docx::relationship_types;
use crate::docx::relationships::{rels_path_for, resolve_target, Relationships};
use std::io::{Read, Seek};

/// Binding-relevant parts of a WordprocessingML package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageParts {
    /// Main document part (usually `word/document.xml`)
    pub main_document: String,
    /// Header parts referenced by the main document
    pub headers: Vec<String>,
    /// Footer parts referenced by the main document
    pub footers: Vec<String>,
    /// Custom XML properties parts, sorted by part name
    pub custom_xml_properties: Vec<String>,
}

impl PackageParts {
    /// Walk the package relationships and collect the binding-relevant parts
    pub fn discover<R: Read + Seek>(reader: &mut DocxReader<R>) -> DocxResult<Self> {
        if !reader.is_valid_package() {
            return Err(DocxError::InvalidStructure(
                "Missing [Content_Types].xml or package relationships".to_string(),
            ));
        }

        let root_rels = Relationships::parse(&reader.read_part_as_string(ROOT_RELS_PART)?)?;
        let doc_rel = root_rels
            .get_by_type(relationship_types::DOCUMENT)
            .ok_or_else(|| DocxError::MissingPart("Main document relationship".into()))?;

        let main_document = resolve_target("", &doc_rel.target);
        if !reader.part_exists(&main_document) {
            return Err(DocxError::MissingPart(main_document));
        }

        let doc_rels = read_rels(reader, &main_document)?;

        let headers = existing_targets(reader, &main_document, &doc_rels, relationship_types::HEADER);
        let footers = existing_targets(reader, &main_document, &doc_rels, relationship_types::FOOTER);

        let mut custom_xml_properties = Vec::new();
        for item in existing_targets(reader, &main_document, &doc_rels, relationship_types::CUSTOM_XML) {
            let item_rels = read_rels(reader, &item)?;
            custom_xml_properties.extend(existing_targets(
                reader,
                &item,
                &item_rels,
                relationship_types::CUSTOM_XML_PROPS,
            ));
        }
        custom_xml_properties.sort();
        custom_xml_properties.dedup();

        Ok(Self {
            main_document,
            headers,
            footers,
            custom_xml_properties,
        })
    }

    /// Parts subject to type-code rewriting, in rewrite order, without duplicates
    ///
    /// Order: main document, headers, footers, custom XML properties.
    pub fn rewrite_targets(&self) -> Vec<&str> {
        let mut targets: Vec<&str> = Vec::new();
        let all = std::iter::once(self.main_document.as_str())
            .chain(self.headers.iter().map(String::as_str))
            .chain(self.footers.iter().map(String::as_str))
            .chain(self.custom_xml_properties.iter().map(String::as_str));

        for part in all {
            if !targets.contains(&part) {
                targets.push(part);
            }
        }
        targets
    }
}

fn read_rels<R: Read + Seek>(reader: &mut DocxReader<R>, part: &str) -> DocxResult<Relationships> {
    let path = rels_path_for(part);
    if reader.part_exists(&path) {
        Relationships::parse(&reader.read_part_as_string(&path)?)
    } else {
        Ok(Relationships::new())
    }
}

fn existing_targets<R: Read + Seek>(
    reader: &DocxReader<R>,
    source_part: &str,
    rels: &Relationships,
    rel_type: &str,
) -> Vec<String> {
    rels.internal_by_type(rel_type)
        .map(|rel| resolve_target(source_part, &rel.target))
        .filter(|path| {
            let exists = reader.part_exists(path);
            if !exists {
                tracing::warn!("{} references missing part {}", source_part, path);
            }
            exists
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::test_support::PackageBuilder;
    use std::io::Cursor;

    #[test]
    fn test_discover_all_categories() {
        let bytes = PackageBuilder::word_document("<w:document/>")
            .header("header1.xml", "<w:hdr/>")
            .footer("footer1.xml", "<w:ftr/>")
            .footer("footer2.xml", "<w:ftr/>")
            .custom_xml(2, "<root/>", "<ds:datastoreItem/>")
            .custom_xml(1, "<root/>", "<ds:datastoreItem/>")
            .build();

        let mut reader = DocxReader::new(Cursor::new(bytes)).unwrap();
        let parts = PackageParts::discover(&mut reader).unwrap();

        assert_eq!(parts.main_document, "word/document.xml");
        assert_eq!(parts.headers, vec!["word/header1.xml"]);
        assert_eq!(parts.footers, vec!["word/footer1.xml", "word/footer2.xml"]);
        assert_eq!(
            parts.custom_xml_properties,
            vec!["customXml/itemProps1.xml", "customXml/itemProps2.xml"]
        );
        assert_eq!(parts.rewrite_targets().len(), 6);
    }

    #[test]
    fn test_dangling_relationship_is_skipped() {
        let bytes = PackageBuilder::word_document("<w:document/>")
            .dangling_header("header9.xml")
            .build();

        let mut reader = DocxReader::new(Cursor::new(bytes)).unwrap();
        let parts = PackageParts::discover(&mut reader).unwrap();
        assert!(parts.headers.is_empty());
    }

    #[test]
    fn test_missing_main_document_relationship() {
        let bytes = PackageBuilder::empty_package().build();
        let mut reader = DocxReader::new(Cursor::new(bytes)).unwrap();

        assert!(matches!(
            PackageParts::discover(&mut reader),
            Err(DocxError::MissingPart(_))
        ));
    }
}
