//! ZIP archive reading and XML parsing utilities

use crate::docx::error::{DocxError, DocxResult};
use crate::docx::text::PartText;
use quick_xml::Reader;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Name of the package-level content types part
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Name of the package-level relationships part
pub const ROOT_RELS_PART: &str = "_rels/.rels";

/// A wrapper around a ZIP archive for reading DOCX packages
pub struct DocxReader<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> DocxReader<R> {
    /// Create a new DOCX reader from a source that implements Read + Seek
    pub fn new(reader: R) -> DocxResult<Self> {
        let archive = ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Read a part from the archive as a string, honoring a byte order mark
    pub fn read_part_as_string(&mut self, path: &str) -> DocxResult<String> {
        Ok(self.read_part_as_text(path)?.text)
    }

    /// Read a part as text along with the encoding it is stored in
    pub fn read_part_as_text(&mut self, path: &str) -> DocxResult<PartText> {
        let bytes = self.read_part_as_bytes(path)?;
        PartText::decode(path, bytes)
    }

    /// Read a part from the archive as bytes
    pub fn read_part_as_bytes(&mut self, path: &str) -> DocxResult<Vec<u8>> {
        let mut file = self.archive.by_name(path).map_err(|e| {
            if matches!(e, zip::result::ZipError::FileNotFound) {
                DocxError::MissingPart(path.to_string())
            } else {
                DocxError::from(e)
            }
        })?;

        let mut contents = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut contents)?;
        Ok(contents)
    }

    /// Check if a part exists in the archive
    pub fn part_exists(&self, path: &str) -> bool {
        self.archive.index_for_name(path).is_some()
    }

    /// Names of all entries in archive order
    pub fn part_names(&self) -> Vec<&str> {
        self.archive.file_names().collect()
    }

    /// Check if this looks like an OPC package at all
    pub fn is_valid_package(&self) -> bool {
        self.part_exists(CONTENT_TYPES_PART) && self.part_exists(ROOT_RELS_PART)
    }

    /// Borrow the underlying archive (used when copying entries verbatim)
    pub(crate) fn archive_mut(&mut self) -> &mut ZipArchive<R> {
        &mut self.archive
    }
}

/// XML reader utilities for parsing package XML content
pub struct XmlParser;

impl XmlParser {
    /// Create a new XML reader from a string
    pub fn from_string(content: &str) -> Reader<&[u8]> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);
        reader
    }

    /// Get an attribute value from an event
    pub fn get_attribute(event: &quick_xml::events::BytesStart, name: &[u8]) -> Option<String> {
        event
            .attributes()
            .filter_map(|a| a.ok())
            .find(|a| a.key.as_ref() == name)
            .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
    }

    /// Check if an element name matches with optional namespace prefix
    pub fn matches_element(name: &[u8], expected: &str) -> bool {
        let name_str = std::str::from_utf8(name).unwrap_or("");
        name_str == expected
            || name_str
                .rsplit_once(':')
                .map(|(_, local)| local == expected)
                .unwrap_or(false)
    }
}
