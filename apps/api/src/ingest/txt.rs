//! Plain-text decoding with a Latin-1 fallback.

use encoding_rs::{UTF_8, WINDOWS_1252};
use tracing::debug;

use super::IngestError;

/// Decodes as UTF-8, falling back to Latin-1 when the bytes are not valid UTF-8.
///
/// Résumés are often saved by editors with a legacy code page; mis-decoded accents are
/// preferable to rejecting the upload. A leading UTF-8 byte-order mark is dropped.
pub fn extract_text(bytes: &[u8]) -> Result<String, IngestError> {
    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        let text = text.strip_prefix('\u{feff}').unwrap_or(&text[..]);
        return Ok(text.to_string());
    }

    debug!(bytes = bytes.len(), "Text upload is not valid UTF-8, decoding as Latin-1");
    // "latin1" resolves to windows-1252, which maps every byte value.
    let (text, had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(IngestError::DecodingError(
            "bytes are neither UTF-8 nor Latin-1".to_string(),
        ));
    }
    Ok(text.into_owned())
}
