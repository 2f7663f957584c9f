pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::resume::handlers;
use crate::state::AppState;

/// Upper bound for request bodies, uploads included.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route("/api/v1/resumes/customize", post(handlers::handle_customize))
        .route("/api/v1/resumes/normalize", post(handlers::handle_normalize))
        .route("/api/v1/resumes/preview", post(handlers::handle_preview))
        .route("/api/v1/resumes/render", post(handlers::handle_render))
        .route("/api/v1/resumes/extract", post(handlers::handle_extract))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::layout::default_layout_config;
    use crate::llm_client::{LlmError, TextGenerator};

    struct CannedGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    fn app(reply: &'static str) -> Router {
        build_router(AppState {
            generator: Arc::new(CannedGenerator(reply)),
            layout: default_layout_config(),
        })
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_body(response: axum::response::Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        serde_json::from_slice(&read_body(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app("{}")
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "vitae-api");
    }

    #[tokio::test]
    async fn test_customize_round_trip() {
        let reply = r#"{"name":"Jane Doe","skills":["Rust","Go"]}"#;
        let response = app(reply)
            .oneshot(post_json(
                "/api/v1/resumes/customize",
                json!({
                    "job_role": "Backend Engineer",
                    "job_description": "Rust services",
                    "original_cv": "Jane Doe\nSkills: Rust, Go"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["document"]["name"], "Jane Doe");
        assert_eq!(body["encoding"], "json");
        assert_eq!(body["file_name"], "Customized_Resume_Backend_Engineer.pdf");
        assert!(body["preview"].as_str().unwrap().contains("* Rust"));
    }

    #[tokio::test]
    async fn test_customize_rejects_blank_role() {
        let response = app("{}")
            .oneshot(post_json(
                "/api/v1/resumes/customize",
                json!({"job_role": " ", "job_description": "x", "original_cv": "y"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_normalize_markup() {
        let response = app("{}")
            .oneshot(post_json(
                "/api/v1/resumes/normalize",
                json!({"raw": "John Smith\n**Skills:**\n* A\n* B\n"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["document"]["name"], "John Smith");
        assert_eq!(body["document"]["skills"], json!(["A", "B"]));
        assert_eq!(body["encoding"], "markup");
        assert_eq!(body["warnings"], json!([]));
    }

    #[tokio::test]
    async fn test_normalize_unrecognized_is_422_with_raw() {
        let response = app("{}")
            .oneshot(post_json(
                "/api/v1/resumes/normalize",
                json!({"raw": "just some prose"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = read_json(response).await;
        assert_eq!(body["error"]["code"], "PARSE_ERROR");
        assert_eq!(body["error"]["raw"], "just some prose");
    }

    #[tokio::test]
    async fn test_preview_returns_markup() {
        let response = app("{}")
            .oneshot(post_json(
                "/api/v1/resumes/preview",
                json!({"name": "Jane", "skills": ["Go"]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let text = String::from_utf8(read_body(response).await).unwrap();
        assert_eq!(text, "Jane\n\n**Skills:**\n* Go\n");
    }

    #[tokio::test]
    async fn test_preview_folds_extra_section_named_like_canonical() {
        let response = app("{}")
            .oneshot(post_json(
                "/api/v1/resumes/preview",
                json!({
                    "name": "Jane",
                    "skills": ["Go"],
                    "additional_sections": [{"title": "Skills", "lines": ["Rust"]}]
                }),
            ))
            .await
            .unwrap();
        let text = String::from_utf8(read_body(response).await).unwrap();
        assert_eq!(text, "Jane\n\n**Skills:**\n* Go\n* Rust\n");
    }

    #[tokio::test]
    async fn test_render_returns_pdf_attachment() {
        let response = app("{}")
            .oneshot(post_json(
                "/api/v1/resumes/render?job_role=Software%20Engineer",
                json!({"name": "Jane Doe", "contact_info": {"email": "jane@example.com"}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Customized_Resume_Software_Engineer.pdf\""
        );
        assert!(read_body(response).await.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_extract_text_upload() {
        let body = "--BOUNDARY\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"cv.txt\"\r\n\
            Content-Type: text/plain\r\n\r\n\
            Jane Doe\nEngineer\r\n\
            --BOUNDARY--\r\n";
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/resumes/extract")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=BOUNDARY")
            .body(Body::from(body))
            .unwrap();
        let response = app("{}").oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["text"], "Jane Doe\nEngineer");
        assert_eq!(body["file_name"], "cv.txt");
    }

    #[tokio::test]
    async fn test_extract_rejects_docx() {
        let body = "--B\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"cv.docx\"\r\n\r\n\
            PK\r\n\
            --B--\r\n";
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/resumes/extract")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=B")
            .body(Body::from(body))
            .unwrap();
        let response = app("{}").oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
