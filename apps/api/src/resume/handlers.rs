//! Axum route handlers for the Resume API.

use axum::{
    extract::{Multipart, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::layout::serialize_markup;
use crate::models::Document;
use crate::normalizer::{canonical_document, normalize, Normalized};
use crate::render::{RenderError, RenderedArtifact};
use crate::resume::customizer::{customize, download_file_name, CustomizeRequest, CustomizeResponse};
use crate::resume::extract::extract_text;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    pub raw: String,
}

#[derive(Debug, Deserialize)]
pub struct RenderQuery {
    pub job_role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub file_name: Option<String>,
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/customize
///
/// Tailors the CV to the job through the text generator and returns the
/// normalized document with a markup preview.
pub async fn handle_customize(
    State(state): State<AppState>,
    Json(request): Json<CustomizeRequest>,
) -> Result<Json<CustomizeResponse>, AppError> {
    let response = customize(&request, state.generator.as_ref()).await?;
    Ok(Json(response))
}

/// POST /api/v1/resumes/normalize
///
/// Normalizes raw text that is already at hand (JSON or markup). No LLM call.
pub async fn handle_normalize(
    Json(request): Json<NormalizeRequest>,
) -> Result<Json<Normalized>, AppError> {
    if request.raw.trim().is_empty() {
        return Err(AppError::Validation("raw cannot be empty".to_string()));
    }
    Ok(Json(normalize(&request.raw)?))
}

/// POST /api/v1/resumes/preview
///
/// Re-serializes an (edited) document as markup text.
pub async fn handle_preview(Json(document): Json<Document>) -> String {
    serialize_markup(&canonical_document(document))
}

/// POST /api/v1/resumes/render?job_role=...
///
/// Renders the document to PDF and returns it as a download. The temporary
/// file is gone by the time the response is sent.
pub async fn handle_render(
    State(state): State<AppState>,
    Query(query): Query<RenderQuery>,
    Json(document): Json<Document>,
) -> Result<Response, AppError> {
    let document = canonical_document(document);
    let config = state.layout.clone();

    let (pages, pdf) = tokio::task::spawn_blocking(move || -> Result<(u32, Vec<u8>), RenderError> {
        let artifact = RenderedArtifact::create(&document, &config)?;
        Ok((artifact.pages(), artifact.read_bytes()?))
    })
    .await
    .map_err(|e| anyhow::anyhow!("render task failed: {e}"))??;

    let file_name = download_file_name(query.job_role.as_deref().unwrap_or_default());
    info!(pages, bytes = pdf.len(), %file_name, "Serving rendered resume");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        Bytes::from(pdf),
    )
        .into_response())
}

/// POST /api/v1/resumes/extract
///
/// Extracts plain text from an uploaded CV (multipart field `file`).
pub async fn handle_extract(mut multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;

        let name = file_name.clone();
        let text = tokio::task::spawn_blocking(move || {
            extract_text(name.as_deref(), content_type.as_deref(), &data)
        })
        .await
        .map_err(|e| anyhow::anyhow!("extraction task failed: {e}"))??;

        return Ok(Json(ExtractResponse { file_name, text }));
    }

    Err(AppError::Validation(
        "multipart field 'file' is required".to_string(),
    ))
}
