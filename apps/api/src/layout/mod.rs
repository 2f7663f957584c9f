// Layout Engine: Document -> draw instructions, plus the canonical markup serializer.
// Pure and deterministic; page breaking belongs to the canvas driver in `render`.

pub mod config;
pub mod engine;
pub mod markup;
pub mod wrap;

// Re-export the public API consumed by the renderer and handlers.
pub use config::{default_layout_config, LayoutConfig};
pub use engine::{contact_lines, layout_document, Bullet, DrawOp, TextLine, TextStyle};
pub use markup::serialize_markup;
pub use wrap::wrap;
