//! Package re-writing
//!
//! Produces a new ZIP container from an existing one, replacing the text of
//! selected parts and copying every other entry verbatim (compressed bytes,
//! headers and all), so untouched parts stay byte-identical.

use crate::docx::error::DocxResult;
use crate::docx::reader::DocxReader;
use std::collections::HashMap;
use std::io::{Read, Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writer that rebuilds a package entry by entry
pub struct PackageWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
}

impl<W: Write + Seek> PackageWriter<W> {
    /// Create a new package writer
    pub fn new(writer: W) -> Self {
        Self {
            zip: ZipWriter::new(writer),
        }
    }

    /// Copy every entry of `source` in archive order, substituting the bytes of
    /// the entries named in `replacements`, and return the finished sink
    pub fn copy_with_replacements<R: Read + Seek>(
        mut self,
        source: &mut DocxReader<R>,
        replacements: &HashMap<String, Vec<u8>>,
    ) -> DocxResult<W> {
        let archive = source.archive_mut();

        for index in 0..archive.len() {
            let (name, compression) = {
                let entry = archive.by_index_raw(index)?;
                (entry.name().to_string(), entry.compression())
            };

            match replacements.get(&name) {
                Some(content) => self.write_part(&name, content, compression)?,
                None => {
                    let entry = archive.by_index_raw(index)?;
                    self.zip.raw_copy_file(entry)?;
                }
            }
        }

        Ok(self.zip.finish()?)
    }

    /// Write an already encoded part using the given compression method
    pub fn write_part(&mut self, path: &str, content: &[u8], compression: CompressionMethod) -> DocxResult<()> {
        let options = SimpleFileOptions::default().compression_method(compression);

        self.zip.start_file(path, options)?;
        self.zip.write_all(content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::test_support::{part_names, read_part, PackageBuilder};
    use std::io::Cursor;

    #[test]
    fn test_copy_without_replacements_keeps_entries() {
        let original = PackageBuilder::word_document("<w:document>hello</w:document>")
            .part("docProps/app.xml", "<Properties/>")
            .build();

        let mut reader = DocxReader::new(Cursor::new(original.as_slice())).unwrap();
        let copy = PackageWriter::new(Cursor::new(Vec::new()))
            .copy_with_replacements(&mut reader, &HashMap::new())
            .unwrap()
            .into_inner();

        assert_eq!(part_names(&copy), part_names(&original));
        assert_eq!(read_part(&copy, "docProps/app.xml"), "<Properties/>");
    }

    #[test]
    fn test_replacement_keeps_entry_position() {
        let original = PackageBuilder::word_document("<w:document>old</w:document>").build();

        let mut replacements = HashMap::new();
        replacements.insert("word/document.xml".to_string(), b"<w:document>new</w:document>".to_vec());

        let mut reader = DocxReader::new(Cursor::new(original.as_slice())).unwrap();
        let copy = PackageWriter::new(Cursor::new(Vec::new()))
            .copy_with_replacements(&mut reader, &replacements)
            .unwrap()
            .into_inner();

        assert_eq!(part_names(&copy), part_names(&original));
        assert_eq!(read_part(&copy, "word/document.xml"), "<w:document>new</w:document>");
    }
}
