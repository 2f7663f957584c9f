//! Canonical resume sections and the label table that names them.
//!
//! Every place that needs to know "which section is this" goes through
//! [`SectionKind`]: the markup parser resolves header labels with
//! [`SectionKind::from_label`], the layout engine picks a formatting strategy
//! by matching on it, and the markup serializer writes [`SectionKind::label`].

use serde::{Deserialize, Serialize};

/// A resume section. The six canonical kinds plus a catch-all for any label
/// the table does not know.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    Contact,
    Summary,
    Skills,
    Experience,
    Education,
    Projects,
    /// Unrecognized section, keyed by its literal label.
    Other(String),
}

/// Canonical sections in render order.
pub const CANONICAL_SECTIONS: [SectionKind; 6] = [
    SectionKind::Contact,
    SectionKind::Summary,
    SectionKind::Skills,
    SectionKind::Experience,
    SectionKind::Education,
    SectionKind::Projects,
];

impl SectionKind {
    /// Resolves a markup header label. Matching is exact and case-sensitive.
    pub fn from_label(label: &str) -> SectionKind {
        match label {
            "Contact Information" => SectionKind::Contact,
            "Professional Summary" => SectionKind::Summary,
            "Skills" => SectionKind::Skills,
            "Work Experience" => SectionKind::Experience,
            "Education" => SectionKind::Education,
            "Personal Projects" => SectionKind::Projects,
            other => SectionKind::Other(other.to_string()),
        }
    }

    /// Header label used in markup and on banners.
    pub fn label(&self) -> &str {
        match self {
            SectionKind::Contact => "Contact Information",
            SectionKind::Summary => "Professional Summary",
            SectionKind::Skills => "Skills",
            SectionKind::Experience => "Work Experience",
            SectionKind::Education => "Education",
            SectionKind::Projects => "Personal Projects",
            SectionKind::Other(label) => label,
        }
    }

    pub fn is_canonical(&self) -> bool {
        !matches!(self, SectionKind::Other(_))
    }
}
