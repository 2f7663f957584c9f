// Canvas: backend-neutral drawing surface plus the paginating driver.
// The layout engine hands over a flat list of DrawOps; this module owns page breaks.

pub mod artifact;
pub mod metrics;
pub mod pdf;

use thiserror::Error;
use tracing::debug;

use crate::layout::{DrawOp, LayoutConfig, TextLine};

pub use artifact::RenderedArtifact;
pub use pdf::{render_pdf, PdfCanvas};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error while writing the document: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF backend error: {0}")]
    Pdf(String),
}

impl From<lopdf::Error> for RenderError {
    fn from(e: lopdf::Error) -> Self {
        RenderError::Pdf(e.to_string())
    }
}

/// A drawing surface. `y` is the distance in millimetres from the top of the
/// printable area of the current page to the top of the item.
pub trait Canvas {
    /// Height available for content on each page, in millimetres.
    fn printable_height(&self) -> f32;

    /// Called before anything is drawn on page `page` (1-based).
    fn page_start(&mut self, _page: u32) -> Result<(), RenderError> {
        Ok(())
    }

    /// Called once page `page` is complete. Footers go here.
    fn page_end(&mut self, _page: u32) -> Result<(), RenderError> {
        Ok(())
    }

    fn draw_title(&mut self, y: f32, text: &str) -> Result<(), RenderError>;
    fn draw_banner(&mut self, y: f32, text: &str) -> Result<(), RenderError>;
    fn draw_line(&mut self, y: f32, line: &TextLine) -> Result<(), RenderError>;
}

/// Feeds `ops` to `canvas`, starting a new page whenever the next drawable
/// instruction would cross the printable height. Gaps never start a page on
/// their own. Returns the number of pages emitted (at least one).
pub fn paginate(
    ops: &[DrawOp],
    canvas: &mut dyn Canvas,
    config: &LayoutConfig,
) -> Result<u32, RenderError> {
    let limit = canvas.printable_height();
    let mut page = 1u32;
    let mut cursor = 0.0_f32;
    canvas.page_start(page)?;

    for op in ops {
        let height = op.height(config);
        if let DrawOp::Space(_) = op {
            cursor += height;
            continue;
        }

        if cursor > 0.0 && cursor + height > limit {
            canvas.page_end(page)?;
            page += 1;
            cursor = 0.0;
            canvas.page_start(page)?;
            debug!(page, "Page break");
        }

        match op {
            DrawOp::Title(text) => canvas.draw_title(cursor, text)?,
            DrawOp::Banner(text) => canvas.draw_banner(cursor, text)?,
            DrawOp::Line(line) => canvas.draw_line(cursor, line)?,
            DrawOp::Space(_) => {}
        }
        cursor += height;
    }

    canvas.page_end(page)?;
    Ok(page)
}
