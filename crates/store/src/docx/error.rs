//! Error types for DOCX package operations

use thiserror::Error;

/// Errors that can occur while reading or rewriting a DOCX package
#[derive(Debug, Error)]
pub enum DocxError {
    /// IO error while reading or writing the package stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML parsing error
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// Invalid package structure
    #[error("Invalid DOCX structure: {0}")]
    InvalidStructure(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// A template binding was found but its value could not be parsed
    #[error("Malformed template binding '{uri}': {reason}")]
    MalformedBinding { uri: String, reason: String },

    /// UTF-8 encoding error
    #[error("UTF-8 encoding error in part {part}: {source}")]
    Utf8 {
        part: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// UTF-16 encoding error
    #[error("UTF-16 encoding error in part {part}: {reason}")]
    Utf16 { part: String, reason: String },
}

impl From<quick_xml::Error> for DocxError {
    fn from(err: quick_xml::Error) -> Self {
        DocxError::XmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for DocxError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        DocxError::XmlParse(format!("Attribute error: {}", err))
    }
}

/// Result type for DOCX operations
pub type DocxResult<T> = std::result::Result<T, DocxError>;
