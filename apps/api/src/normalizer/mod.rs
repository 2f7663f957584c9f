//! Content Normalizer: turns raw generative-service output into a [`Document`].
//!
//! Two encodings are accepted:
//! - JSON matching the document schema, optionally wrapped in a fenced block
//!   (`structured::parse_structured`);
//! - loosely-marked resume text with `**Label:**` headers
//!   (`markup::parse_markup`).
//!
//! `normalize` picks the encoding. Text that matches neither is a
//! [`ParseError`], never a degraded document.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Document;

pub mod contact;
pub mod markup;
pub mod structured;

pub use markup::parse_markup;
pub use structured::parse_structured;

// ────────────────────────────────────────────────────────────────────────────
// Errors and warnings
// ────────────────────────────────────────────────────────────────────────────

/// Fatal normalization failure. Every variant keeps the raw input.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed JSON document: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("fenced block is never closed")]
    UnterminatedFence { raw: String },

    #[error("input is neither a JSON document nor sectioned resume text")]
    Unrecognized { raw: String },
}

impl ParseError {
    /// The untouched input that failed to parse.
    pub fn raw(&self) -> &str {
        match self {
            ParseError::Json { raw, .. }
            | ParseError::UnterminatedFence { raw }
            | ParseError::Unrecognized { raw } => raw,
        }
    }
}

/// Non-fatal oddity found while reading markup. The affected line is either
/// skipped or stored verbatim; parsing always continues. Line numbers are
/// 1-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructuralWarning {
    /// Sub-bullet seen while no entry was open. Discarded.
    OrphanSubBullet { line: usize, text: String },
    /// Well-formed header whose label is not a canonical section. Kept as an
    /// additional section.
    UnrecognizedHeader { line: usize, label: String },
    /// Header-like line that misses the exact `**Label:**` form but names a
    /// canonical section. Treated as that header.
    MalformedHeader {
        line: usize,
        text: String,
        label: String,
    },
    /// Content between the name and the first header. Discarded.
    DiscardedPreamble { line: usize, text: String },
}

impl fmt::Display for StructuralWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralWarning::OrphanSubBullet { line, text } => {
                write!(f, "line {line}: sub-bullet with no open entry: {text:?}")
            }
            StructuralWarning::UnrecognizedHeader { line, label } => {
                write!(f, "line {line}: unrecognized section {label:?} kept verbatim")
            }
            StructuralWarning::MalformedHeader { line, text, label } => {
                write!(f, "line {line}: {text:?} read as {label:?} header")
            }
            StructuralWarning::DiscardedPreamble { line, text } => {
                write!(f, "line {line}: text before first section discarded: {text:?}")
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Dispatch
// ────────────────────────────────────────────────────────────────────────────

/// Which input encoding produced a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    Json,
    Markup,
}

/// A normalized document plus everything worth reporting about how it was read.
#[derive(Debug, Clone, Serialize)]
pub struct Normalized {
    pub document: Document,
    pub encoding: Encoding,
    pub warnings: Vec<StructuralWarning>,
}

/// Normalizes raw text in either encoding.
///
/// - Text starting with `{` or a fence containing `{...}` is decoded as JSON.
/// - A fence around markup is unwrapped and read as markup.
/// - Otherwise the text must contain at least one section header.
pub fn normalize(raw: &str) -> Result<Normalized, ParseError> {
    let trimmed = raw.trim();

    if trimmed.starts_with('{') {
        return parse_structured(raw).map(json_result);
    }

    let body = if trimmed.starts_with(structured::FENCE) {
        let inner = structured::strip_fences(raw).ok_or_else(|| {
            ParseError::UnterminatedFence {
                raw: raw.to_string(),
            }
        })?;
        if inner.starts_with('{') {
            return parse_structured(raw).map(json_result);
        }
        inner
    } else {
        trimmed
    };

    if !markup::has_section_header(body) {
        return Err(ParseError::Unrecognized {
            raw: raw.to_string(),
        });
    }

    let parsed = parse_markup(body);
    debug!(
        warnings = parsed.warnings.len(),
        "Normalized markup resume for {}", parsed.document.name
    );
    Ok(parsed)
}

/// Normalizes a decoded or edited document. Additional sections titled with a
/// canonical label are folded into that section, so each section appears once.
pub fn canonical_document(document: Document) -> Document {
    let mut document = document.normalized();
    let mut warnings = Vec::new();
    markup::fold_canonical_extras(&mut document, &mut warnings);
    log_warnings(&warnings);
    document.normalized()
}

fn json_result(document: Document) -> Normalized {
    Normalized {
        document,
        encoding: Encoding::Json,
        warnings: Vec::new(),
    }
}

/// Logs every warning at `warn` level.
pub(crate) fn log_warnings(warnings: &[StructuralWarning]) {
    for w in warnings {
        warn!("Resume markup: {w}");
    }
}
