//! Scoped rendered PDF on disk.
//!
//! The temporary file lives exactly as long as the [`RenderedArtifact`]: it is
//! removed when the artifact is dropped, and a failed render never leaves a
//! file behind.

use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::layout::LayoutConfig;
use crate::models::Document;
use crate::render::{render_pdf, RenderError};

#[derive(Debug)]
pub struct RenderedArtifact {
    file: NamedTempFile,
    pages: u32,
}

impl RenderedArtifact {
    /// Renders `doc` into a fresh `.pdf` in the system temp directory.
    pub fn create(doc: &Document, config: &LayoutConfig) -> Result<Self, RenderError> {
        Self::create_in(std::env::temp_dir(), doc, config)
    }

    pub fn create_in(
        dir: impl AsRef<Path>,
        doc: &Document,
        config: &LayoutConfig,
    ) -> Result<Self, RenderError> {
        Self::write_in(dir.as_ref(), |mut writer| render_pdf(doc, config, &mut writer))
    }

    fn write_in<F>(dir: &Path, render: F) -> Result<Self, RenderError>
    where
        F: FnOnce(&mut dyn Write) -> Result<u32, RenderError>,
    {
        // Dropping `file` on any early return deletes it.
        let mut file = tempfile::Builder::new()
            .prefix("resume-")
            .suffix(".pdf")
            .tempfile_in(dir)?;

        let pages = {
            let mut writer = BufWriter::new(file.as_file_mut());
            let pages = render(&mut writer)?;
            writer.flush()?;
            pages
        };

        debug!(path = %file.path().display(), pages, "Rendered artifact");
        Ok(Self { file, pages })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn pages(&self) -> u32 {
        self.pages
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>, RenderError> {
        Ok(std::fs::read(self.path())?)
    }
}
