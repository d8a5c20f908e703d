//! PDF text extraction.

use std::panic;

use tracing::{debug, warn};

use super::{DocumentFormat, IngestError};

/// Concatenates the text of every page in page order.
///
/// Pages with no text layer (scanned images) contribute nothing, so an image-only PDF yields
/// an empty string rather than an error. Only bytes that cannot be parsed as a PDF fail.
pub fn extract_text(bytes: &[u8]) -> Result<String, IngestError> {
    // The parser has known panics on some malformed font programs; contain them to this upload.
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| {
            warn!("PDF parser panicked on malformed input");
            corrupt("parser aborted on malformed content")
        })?
        .map_err(|e| corrupt(e.to_string()))?;

    debug!(pages = pages.len(), "Extracted PDF pages");
    Ok(pages.concat())
}

fn corrupt(reason: impl Into<String>) -> IngestError {
    IngestError::CorruptDocument {
        format: DocumentFormat::Pdf,
        reason: reason.into(),
    }
}
