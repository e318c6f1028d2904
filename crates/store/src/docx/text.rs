//! Text decoding of XML parts
//!
//! Package parts are normally UTF-8, but UTF-16 with a byte order mark is legal
//! too. A decoded part remembers its encoding so a rewritten part is stored the
//! same way it was read.

use crate::docx::error::{DocxError, DocxResult};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Byte-level encoding of a part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf8Bom,
    Utf16Le,
    Utf16Be,
}

/// A part's text together with the encoding it was stored in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartText {
    pub text: String,
    pub encoding: TextEncoding,
}

impl PartText {
    /// Decode part bytes, choosing the encoding from the byte order mark
    pub fn decode(part: &str, bytes: Vec<u8>) -> DocxResult<Self> {
        if bytes.starts_with(&UTF8_BOM) {
            let text = utf8(part, bytes[UTF8_BOM.len()..].to_vec())?;
            return Ok(Self::new(text, TextEncoding::Utf8Bom));
        }
        if bytes.starts_with(&UTF16_LE_BOM) {
            let text = utf16(part, &bytes[2..], u16::from_le_bytes)?;
            return Ok(Self::new(text, TextEncoding::Utf16Le));
        }
        if bytes.starts_with(&UTF16_BE_BOM) {
            let text = utf16(part, &bytes[2..], u16::from_be_bytes)?;
            return Ok(Self::new(text, TextEncoding::Utf16Be));
        }
        Ok(Self::new(utf8(part, bytes)?, TextEncoding::Utf8))
    }

    fn new(text: String, encoding: TextEncoding) -> Self {
        Self { text, encoding }
    }

    /// Encode `text` the way this part was stored, byte order mark included
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self.encoding {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Utf8Bom => [&UTF8_BOM[..], text.as_bytes()].concat(),
            TextEncoding::Utf16Le => {
                let mut bytes = UTF16_LE_BOM.to_vec();
                bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
                bytes
            }
            TextEncoding::Utf16Be => {
                let mut bytes = UTF16_BE_BOM.to_vec();
                bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
                bytes
            }
        }
    }
}

fn utf8(part: &str, bytes: Vec<u8>) -> DocxResult<String> {
    String::from_utf8(bytes).map_err(|source| DocxError::Utf8 {
        part: part.to_string(),
        source,
    })
}

fn utf16(part: &str, bytes: &[u8], unit: fn([u8; 2]) -> u16) -> DocxResult<String> {
    if bytes.len() % 2 != 0 {
        return Err(DocxError::Utf16 {
            part: part.to_string(),
            reason: "odd number of bytes".to_string(),
        });
    }

    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|e| DocxError::Utf16 {
            part: part.to_string(),
            reason: e.to_string(),
        })
}
