//! JSON decoding of the document schema, with optional fenced-block unwrapping.

use crate::models::Document;
use crate::normalizer::{canonical_document, ParseError};

pub(crate) const FENCE: &str = "```";

/// Decodes a JSON document, removing a surrounding fenced block first.
///
/// Missing keys take their defaults; malformed JSON or wrong value types are
/// a [`ParseError`] carrying `raw` unchanged.
pub fn parse_structured(raw: &str) -> Result<Document, ParseError> {
    let body = strip_fences(raw).ok_or_else(|| ParseError::UnterminatedFence {
        raw: raw.to_string(),
    })?;

    let document: Document =
        serde_json::from_str(body).map_err(|source| ParseError::Json {
            source,
            raw: raw.to_string(),
        })?;

    Ok(canonical_document(document))
}

/// Strips ```` ```lang ... ``` ```` or ```` ``` ... ``` ```` fences.
///
/// Unfenced text comes back trimmed. Returns `None` when an opening fence has
/// no closing fence.
pub(crate) fn strip_fences(text: &str) -> Option<&str> {
    let text = text.trim();
    let Some(body) = text.strip_prefix(FENCE) else {
        return Some(text);
    };
    strip_language_tag(body)
        .trim_end()
        .strip_suffix(FENCE)
        .map(str::trim)
}

/// Drops a language tag (`json`, `markdown`, ...) directly after the opening
/// fence. A tag must be followed by whitespace.
fn strip_language_tag(body: &str) -> &str {
    let tag_len = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '.')))
        .unwrap_or(body.len());
    let rest = &body[tag_len..];
    if tag_len > 0 && rest.starts_with(char::is_whitespace) {
        rest
    } else {
        body
    }
}
