use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::normalizer::ParseError;
use crate::render::RenderError;
use crate::resume::extract::ExtractError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Could not parse resume text: {0}")]
    Parse(#[from] ParseError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut raw: Option<String> = None;
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Parse(e) => {
                tracing::warn!(raw_len = e.raw().len(), "Parse error: {e}");
                raw = Some(e.raw().to_string());
                (StatusCode::UNPROCESSABLE_ENTITY, "PARSE_ERROR", e.to_string())
            }
            AppError::Extract(ExtractError::Unsupported(kind)) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                format!("Unsupported file type: {kind}. Upload a PDF or TXT file"),
            ),
            AppError::Extract(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EXTRACTION_ERROR",
                e.to_string(),
            ),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_ERROR",
                    "The PDF could not be produced".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let (Some(raw), Value::Object(map)) = (raw, &mut error) {
            map.insert("raw".to_string(), Value::String(raw));
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(error: AppError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_is_bad_request() {
        let (status, body) = body_json(AppError::Validation("job_role cannot be empty".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "job_role cannot be empty");
        assert!(body["error"].get("raw").is_none());
    }

    #[tokio::test]
    async fn test_parse_error_carries_raw_text() {
        let error = ParseError::Unrecognized {
            raw: "Sorry, I cannot help".into(),
        };
        let (status, body) = body_json(error.into()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "PARSE_ERROR");
        assert_eq!(body["error"]["raw"], "Sorry, I cannot help");
    }

    #[tokio::test]
    async fn test_unsupported_upload() {
        let (status, body) =
            body_json(ExtractError::Unsupported("resume.docx".into()).into()).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_MEDIA_TYPE");
    }

    #[tokio::test]
    async fn test_llm_details_are_not_leaked() {
        let (status, body) = body_json(AppError::Llm("401 Invalid API Key".into())).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!body["error"]["message"].as_str().unwrap().contains("API Key"));
    }
}
