//! The synchronous end-to-end pipeline. Everything here is local to one call; the only shared
//! state is the predictor's read-only artifacts.

use tracing::info;

use crate::errors::AppError;
use crate::ingest::{self, DocumentFormat, UploadedDocument};
use crate::model::{CategoryPredictor, ModelError};
use crate::normalize::normalize;

/// Every intermediate product of classifying one upload.
#[derive(Debug, Clone)]
pub struct Classification {
    pub format: DocumentFormat,
    pub extracted_text: String,
    pub cleaned_text: String,
    pub category: String,
}

pub fn classify_document(
    document: &UploadedDocument,
    predictor: &CategoryPredictor,
) -> Result<Classification, AppError> {
    let format = document.format()?;
    let extracted_text = ingest::extract_as(format, &document.bytes)?;
    let (cleaned_text, category) = classify_text(&extracted_text, predictor)?;

    info!(
        filename = %document.filename,
        %format,
        extracted_chars = extracted_text.chars().count(),
        %category,
        "Classified résumé"
    );

    Ok(Classification {
        format,
        extracted_text,
        cleaned_text,
        category,
    })
}

/// Normalizes raw résumé text and predicts its category. Returns `(cleaned_text, category)`.
pub fn classify_text(
    raw_text: &str,
    predictor: &CategoryPredictor,
) -> Result<(String, String), ModelError> {
    let cleaned = normalize(raw_text);
    let category = predictor.predict(&cleaned)?;
    Ok((cleaned, category))
}
