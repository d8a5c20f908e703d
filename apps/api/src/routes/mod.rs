pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::resume::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/categories", get(handlers::handle_categories))
        // Uploads
        .route("/api/v1/resumes/classify", post(handlers::handle_classify))
        .route("/api/v1/resumes/extract", post(handlers::handle_extract))
        // Raw text
        .route("/api/v1/text/normalize", post(handlers::handle_normalize))
        .route("/api/v1/text/classify", post(handlers::handle_classify_text))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::{testing, CategoryPredictor};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "resume-classifier-test-boundary";

    fn test_state(max_upload_bytes: usize) -> AppState {
        AppState {
            config: Config {
                artifact_dir: PathBuf::from("unused"),
                vectorizer_file: "vectorizer.json".to_string(),
                classifier_file: "classifier.json".to_string(),
                encoder_file: "encoder.json".to_string(),
                port: 0,
                max_upload_bytes,
                rust_log: "info".to_string(),
            },
            predictor: CategoryPredictor::new(Arc::new(testing::artifacts())),
        }
    }

    fn app() -> Router {
        build_router(test_state(1024 * 1024))
    }

    fn multipart_request(uri: &str, field: &str, filename: &str, content: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(uri: &str, value: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health_reports_categories() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["categories"], 3);
    }

    #[tokio::test]
    async fn test_categories_in_decoder_order() {
        let request = Request::builder()
            .uri("/api/v1/categories")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["categories"],
            json!(["Data Science", "Health and fitness", "Java Developer"])
        );
    }

    #[tokio::test]
    async fn test_classify_txt_upload() {
        let request = multipart_request(
            "/api/v1/resumes/classify?include_text=true",
            "file",
            "Resume.TXT",
            b"Experienced Java Developer. Contact: dev@example.com #hiring http://example.com",
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["category"], "Java Developer");
        assert_eq!(body["format"], "txt");
        assert_eq!(body["filename"], "Resume.TXT");
        assert_eq!(body["cleaned_text"], "experienced java developer contact");
    }

    #[tokio::test]
    async fn test_classify_omits_text_by_default() {
        let request = multipart_request("/api/v1/resumes/classify", "file", "cv.txt", b"python data");
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "Data Science");
        assert!(body.get("extracted_text").is_none());
        assert!(body.get("cleaned_text").is_none());
    }

    #[tokio::test]
    async fn test_unsupported_upload_is_415() {
        let request =
            multipart_request("/api/v1/resumes/classify", "file", "resume.xlsx", b"PK\x03\x04");
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_FORMAT");
        assert!(body["error"]["message"].as_str().unwrap().contains("xlsx"));
    }

    #[tokio::test]
    async fn test_corrupt_docx_is_422() {
        let request =
            multipart_request("/api/v1/resumes/classify", "file", "resume.docx", b"not a zip");
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "CORRUPT_DOCUMENT");
    }

    #[tokio::test]
    async fn test_empty_pdf_upload_is_422() {
        let request = multipart_request("/api/v1/resumes/classify", "file", "resume.pdf", b"");
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
        assert_eq!(body["error"]["code"], "CORRUPT_DOCUMENT");
    }

    #[tokio::test]
    async fn test_empty_txt_upload_still_classifies() {
        let request = multipart_request("/api/v1/resumes/classify", "file", "blank.txt", b"");
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["extracted_chars"], 0);
        assert!(body["category"].is_string());
    }

    #[tokio::test]
    async fn test_extracted_chars_counts_characters_not_bytes() {
        let request = multipart_request(
            "/api/v1/resumes/classify",
            "file",
            "cv.txt",
            "Ingénieur Zürich".as_bytes(),
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["extracted_chars"], 16);
    }

    #[tokio::test]
    async fn test_missing_file_field_is_400() {
        let request = multipart_request("/api/v1/resumes/classify", "attachment", "cv.txt", b"java");
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let app = build_router(test_state(64));
        let request = multipart_request(
            "/api/v1/resumes/classify",
            "file",
            "cv.txt",
            "java developer ".repeat(50).as_bytes(),
        );
        let (status, _) = send(app, request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_extract_endpoint() {
        let request = multipart_request(
            "/api/v1/resumes/extract",
            "file",
            "cv.txt",
            "Registered Nurse\nICU".as_bytes(),
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "Registered Nurse\nICU");
    }

    #[tokio::test]
    async fn test_normalize_endpoint() {
        let request = json_request(
            "/api/v1/text/normalize",
            json!({ "text": "RT Hello,   WORLD! #tag" }),
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cleaned_text"], "hello world");
    }

    #[tokio::test]
    async fn test_classify_text_endpoint() {
        let request = json_request(
            "/api/v1/text/classify",
            json!({ "text": "Nurse with 10 years of patient care" }),
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "Health and fitness");
    }
}
