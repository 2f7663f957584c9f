pub mod document;
pub mod section;

pub use document::{
    ContactInfo, Document, EducationEntry, Experience, ExtraSection, Project, DEFAULT_NAME,
};
pub use section::{SectionKind, CANONICAL_SECTIONS};
