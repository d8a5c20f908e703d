//! Axum route handlers for the classification API.

use axum::{
    extract::{multipart::MultipartError, Multipart, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::ingest::{self, DocumentFormat, UploadedDocument};
use crate::normalize::normalize;
use crate::resume::pipeline::{classify_document, classify_text};
use crate::state::AppState;

/// Multipart field carrying the uploaded résumé.
pub const UPLOAD_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ClassifyOptions {
    /// Echo the extracted and cleaned text back to the caller.
    #[serde(default)]
    pub include_text: bool,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub filename: String,
    pub format: DocumentFormat,
    pub category: String,
    pub extracted_chars: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaned_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub filename: String,
    pub format: DocumentFormat,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub cleaned_text: String,
}

#[derive(Debug, Serialize)]
pub struct TextClassifyResponse {
    pub category: String,
    pub cleaned_text: String,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/classify
///
/// Accepts a multipart upload (field `file`) and returns the predicted job category.
pub async fn handle_classify(
    State(state): State<AppState>,
    Query(options): Query<ClassifyOptions>,
    multipart: Multipart,
) -> Result<Json<ClassifyResponse>, AppError> {
    let document = read_upload(multipart).await?;
    let predictor = state.predictor.clone();
    let filename = document.filename.clone();

    let result = run_blocking(move || classify_document(&document, &predictor)).await??;

    Ok(Json(ClassifyResponse {
        filename,
        format: result.format,
        category: result.category,
        extracted_chars: result.extracted_text.chars().count(),
        extracted_text: options.include_text.then_some(result.extracted_text),
        cleaned_text: options.include_text.then_some(result.cleaned_text),
    }))
}

/// POST /api/v1/resumes/extract
///
/// Returns the raw text extracted from an upload without classifying it.
pub async fn handle_extract(multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    let document = read_upload(multipart).await?;
    let format = document.format()?;
    let filename = document.filename.clone();

    let text = run_blocking(move || ingest::extract(&document)).await??;

    Ok(Json(ExtractResponse {
        filename,
        format,
        text,
    }))
}

/// POST /api/v1/text/normalize
pub async fn handle_normalize(
    Json(request): Json<TextRequest>,
) -> Result<Json<NormalizeResponse>, AppError> {
    let cleaned_text = run_blocking(move || normalize(&request.text)).await?;
    Ok(Json(NormalizeResponse { cleaned_text }))
}

/// POST /api/v1/text/classify
///
/// Classifies already-extracted résumé text. The text is normalized first.
pub async fn handle_classify_text(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> Result<Json<TextClassifyResponse>, AppError> {
    let predictor = state.predictor.clone();
    let (cleaned_text, category) =
        run_blocking(move || classify_text(&request.text, &predictor)).await??;
    Ok(Json(TextClassifyResponse {
        category,
        cleaned_text,
    }))
}

/// GET /api/v1/categories
pub async fn handle_categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: state.predictor.categories().to_vec(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Pulls the first `file` field out of a multipart body.
async fn read_upload(mut multipart: Multipart) -> Result<UploadedDocument, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| AppError::Validation("Uploaded file has no filename".to_string()))?;
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(UploadedDocument::new(filename, bytes));
    }
    Err(AppError::Validation(format!(
        "Multipart field '{UPLOAD_FIELD}' is required"
    )))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("Malformed upload: {}", e.body_text()))
    }
}

/// Runs CPU-bound work off the async executor.
async fn run_blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("classification task failed: {e}")))
}
