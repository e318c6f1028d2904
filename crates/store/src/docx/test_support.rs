//! In-memory package fixtures shared by the crate's tests

use crate::docx::{relationship_types, CUSTOM_XML_NAMESPACE, TEMPLATE_URI_ROOT};
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:styleId="Normal"/></w:styles>"#;

/// Builds small but structurally complete OPC packages
#[derive(Debug, Clone)]
pub struct PackageBuilder {
    main_document: Option<String>,
    doc_rels: Vec<(String, String)>,
    parts: Vec<(String, Vec<u8>)>,
}

impl PackageBuilder {
    /// A package whose main document part holds `document_xml`
    pub fn word_document(document_xml: &str) -> Self {
        Self {
            main_document: Some(document_xml.to_string()),
            doc_rels: Vec::new(),
            parts: vec![("word/styles.xml".to_string(), STYLES.as_bytes().to_vec())],
        }
    }

    /// A package with content types and root relationships but no main document
    pub fn empty_package() -> Self {
        Self {
            main_document: None,
            doc_rels: Vec::new(),
            parts: Vec::new(),
        }
    }

    pub fn header(mut self, name: &str, xml: impl AsRef<[u8]>) -> Self {
        self.doc_rels.push((relationship_types::HEADER.to_string(), name.to_string()));
        self.parts.push((format!("word/{}", name), xml.as_ref().to_vec()));
        self
    }

    pub fn footer(mut self, name: &str, xml: impl AsRef<[u8]>) -> Self {
        self.doc_rels.push((relationship_types::FOOTER.to_string(), name.to_string()));
        self.parts.push((format!("word/{}", name), xml.as_ref().to_vec()));
        self
    }

    /// Relationship to a header that is not present in the archive
    pub fn dangling_header(mut self, name: &str) -> Self {
        self.doc_rels.push((relationship_types::HEADER.to_string(), name.to_string()));
        self
    }

    /// Custom XML item `n` with its data part and properties part
    pub fn custom_xml(mut self, n: u32, item_xml: &str, props_xml: impl AsRef<[u8]>) -> Self {
        self.doc_rels.push((
            relationship_types::CUSTOM_XML.to_string(),
            format!("../customXml/item{}.xml", n),
        ));
        self.parts.push((format!("customXml/item{}.xml", n), item_xml.as_bytes().to_vec()));
        self.parts.push((
            format!("customXml/_rels/item{}.xml.rels", n),
            rels_xml(&[(
                relationship_types::CUSTOM_XML_PROPS.to_string(),
                format!("itemProps{}.xml", n),
            )])
            .into_bytes(),
        ));
        self.parts.push((format!("customXml/itemProps{}.xml", n), props_xml.as_ref().to_vec()));
        self
    }

    /// Arbitrary extra part with no relationship pointing at it
    pub fn part(mut self, name: &str, content: impl AsRef<[u8]>) -> Self {
        self.parts.push((name.to_string(), content.as_ref().to_vec()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut write = |name: &str, content: &[u8]| {
            zip.start_file(name, options).unwrap();
            zip.write_all(content).unwrap();
        };

        write("[Content_Types].xml", CONTENT_TYPES.as_bytes());
        match &self.main_document {
            Some(document) => {
                write(
                    "_rels/.rels",
                    rels_xml(&[(
                        relationship_types::DOCUMENT.to_string(),
                        "word/document.xml".to_string(),
                    )])
                    .as_bytes(),
                );
                write("word/document.xml", document.as_bytes());
                write("word/_rels/document.xml.rels", rels_xml(&self.doc_rels).as_bytes());
            }
            None => write("_rels/.rels", rels_xml(&[]).as_bytes()),
        }
        for (name, content) in &self.parts {
            write(name, content.as_slice());
        }

        zip.finish().unwrap().into_inner()
    }
}

fn rels_xml(rels: &[(String, String)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (i, (rel_type, target)) in rels.iter().enumerate() {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{}" Target="{}"/>"#,
            i + 1,
            rel_type,
            target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

/// Template namespace URI for an entity binding
pub fn binding_uri(entity: &str, code: i32) -> String {
    format!("{}{}/{}/", TEMPLATE_URI_ROOT, entity, code)
}

/// Custom XML properties part declaring a schema reference to `uri`
pub fn props_xml(uri: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?><ds:datastoreItem ds:itemID="{{7D5B6F2A-1C3E-4B8D-9F00-5A4E2C1B0D9E}}" xmlns:ds="{}"><ds:schemaRefs><ds:schemaRef ds:uri="{}"/></ds:schemaRefs></ds:datastoreItem>"#,
        CUSTOM_XML_NAMESPACE, uri
    )
}

/// Main document body with a data-bound content control for the entity
pub fn bound_document_xml(entity: &str, code: i32) -> String {
    format!(
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:sdt><w:sdtPr><w:dataBinding w:prefixMappings="xmlns:ns0='{}'" w:xpath="/ns0:DocumentTemplate[1]/{}[1]/name[1]"/></w:sdtPr></w:sdt></w:body></w:document>"#,
        binding_uri(entity, code),
        entity
    )
}

/// A WordprocessingML template bound to `entity` with type code `code`
///
/// The binding appears in the main document, the header, and the custom XML
/// parts; the footer and styles parts carry no binding.
pub fn bound_template(entity: &str, code: i32) -> PackageBuilder {
    let uri = binding_uri(entity, code);
    PackageBuilder::word_document(&bound_document_xml(entity, code))
        .header(
            "header1.xml",
            &format!(
                r#"<w:hdr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:dataBinding w:prefixMappings="xmlns:ns0='{}'"/></w:hdr>"#,
                uri
            ),
        )
        .footer(
            "footer1.xml",
            r#"<w:ftr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:p/></w:ftr>"#,
        )
        .custom_xml(
            1,
            &format!(r#"<DocumentTemplate xmlns="{}"><{}/></DocumentTemplate>"#, uri, entity),
            &props_xml(&uri),
        )
}

/// UTF-16LE bytes with a byte order mark
pub fn utf16le(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
    bytes
}

/// Read one entry of a package as raw bytes
pub fn read_part_bytes(package: &[u8], name: &str) -> Vec<u8> {
    let mut archive = ZipArchive::new(Cursor::new(package)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).unwrap();
    bytes
}

/// Read one entry of a package as text
pub fn read_part(package: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(package)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut text = String::new();
    file.read_to_string(&mut text).unwrap();
    text
}

/// Entry names of a package, in archive order
pub fn part_names(package: &[u8]) -> Vec<String> {
    let archive = ZipArchive::new(Cursor::new(package)).unwrap();
    archive.file_names().map(str::to_string).collect()
}
