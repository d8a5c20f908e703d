//! Document ingestion: resolves an upload's declared format and routes its bytes to the
//! matching text extractor.
//!
//! Dispatch is decided once from the filename extension. There is no content sniffing: a PDF
//! renamed to `.txt` is decoded as text.

pub mod docx;
pub mod pdf;
pub mod txt;

use std::fmt;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unsupported file type '{0}'. Please upload a PDF, DOCX, or TXT file.")]
    UnsupportedFormat(String),

    #[error("Could not parse {format} document: {reason}")]
    CorruptDocument {
        format: DocumentFormat,
        reason: String,
    },

    #[error("Could not decode text document: {0}")]
    DecodingError(String),
}

/// The closed set of upload formats the service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    /// Case-insensitive lookup of a bare extension (no leading dot).
    pub fn from_extension(extension: &str) -> Result<Self, IngestError> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" => Ok(Self::Txt),
            _ => Err(IngestError::UnsupportedFormat(extension.to_string())),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Txt => "TXT",
        };
        f.write_str(name)
    }
}

/// A single upload as received from the caller. Read-only for the whole pipeline.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub bytes: Bytes,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Substring after the last `.`, or empty when the name has no dot.
    pub fn extension(&self) -> &str {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or("")
    }

    pub fn format(&self) -> Result<DocumentFormat, IngestError> {
        DocumentFormat::from_extension(self.extension())
    }
}

/// Extracts the full text of an upload, choosing the extractor from its declared extension.
pub fn extract(document: &UploadedDocument) -> Result<String, IngestError> {
    let format = document.format()?;
    extract_as(format, &document.bytes)
}

/// Runs the extractor for an already-resolved format.
///
/// Zero bytes is an empty plain-text file but not a valid PDF or DOCX package.
pub fn extract_as(format: DocumentFormat, bytes: &[u8]) -> Result<String, IngestError> {
    let text = match format {
        DocumentFormat::Pdf => pdf::extract_text(bytes)?,
        DocumentFormat::Docx => docx::extract_text(bytes)?,
        DocumentFormat::Txt => txt::extract_text(bytes)?,
    };
    debug!(%format, bytes = bytes.len(), chars = text.chars().count(), "Extracted document text");
    Ok(text)
}
