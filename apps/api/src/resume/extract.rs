//! Plain-text extraction from uploaded CV files.
//!
//! PDF goes through `pdf-extract`; `.txt` is read as UTF-8 with invalid bytes
//! replaced. Anything else is rejected.

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file type: {0}")]
    Unsupported(String),

    #[error("uploaded file is empty")]
    Empty,

    #[error("no text could be extracted from the file")]
    NoText,

    #[error("PDF text extraction failed: {0}")]
    Pdf(String),
}

impl From<pdf_extract::OutputError> for ExtractError {
    fn from(err: pdf_extract::OutputError) -> Self {
        ExtractError::Pdf(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    Text,
}

/// Decides how to read an upload. The PDF magic number wins over the name;
/// otherwise the extension, then the declared content type, decide.
pub fn detect_kind(
    file_name: Option<&str>,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<SourceKind, ExtractError> {
    if bytes.starts_with(b"%PDF") {
        return Ok(SourceKind::Pdf);
    }

    let extension = file_name
        .and_then(|n| n.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => return Ok(SourceKind::Pdf),
        Some("txt") => return Ok(SourceKind::Text),
        _ => {}
    }

    match content_type.map(|c| c.split(';').next().unwrap_or(c).trim()) {
        Some("application/pdf") => Ok(SourceKind::Pdf),
        Some("text/plain") => Ok(SourceKind::Text),
        _ => Err(ExtractError::Unsupported(
            file_name
                .or(content_type)
                .unwrap_or("unknown")
                .to_string(),
        )),
    }
}

/// Extracts trimmed text from an upload. CPU-bound for PDFs; call from
/// `spawn_blocking`.
pub fn extract_text(
    file_name: Option<&str>,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<String, ExtractError> {
    if bytes.is_empty() {
        return Err(ExtractError::Empty);
    }

    let kind = detect_kind(file_name, content_type, bytes)?;
    let text = match kind {
        SourceKind::Pdf => pdf_extract::extract_text_from_mem(bytes)?,
        SourceKind::Text => String::from_utf8_lossy(bytes).into_owned(),
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(ExtractError::NoText);
    }
    info!(?kind, bytes = bytes.len(), chars = text.len(), "Extracted upload text");
    Ok(text.to_string())
}
