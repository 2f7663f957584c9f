//! Page geometry and typographic constants for the resume layout.
//!
//! Vertical and horizontal distances are in millimetres measured from the
//! top-left printable corner. Wrap widths are in characters: line breaking
//! counts characters, not glyph widths.

use serde::{Deserialize, Serialize};

/// Layout parameters for a resume page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_left_mm: f32,
    pub margin_right_mm: f32,
    pub margin_top_mm: f32,
    /// Space kept free at the bottom of each page; a line that would cross it
    /// moves to the next page. The page footer is drawn inside this band.
    pub margin_bottom_mm: f32,

    /// Wrap width for paragraphs, headings, and contact lines.
    pub body_width_chars: usize,
    /// Wrap width for bullet text.
    pub bullet_width_chars: usize,

    pub title_height_mm: f32,
    pub banner_height_mm: f32,
    pub line_height_mm: f32,
    pub title_gap_mm: f32,
    pub banner_gap_mm: f32,
    pub entry_gap_mm: f32,
    pub section_gap_mm: f32,

    /// Indent of the glyph on a skill bullet, and the glyph cell width.
    pub skill_indent_mm: f32,
    pub skill_glyph_mm: f32,
    /// Indent of the glyph on an achievement/detail bullet, and the glyph cell
    /// width. Continuation lines start at `detail_indent_mm + detail_glyph_mm`.
    pub detail_indent_mm: f32,
    pub detail_glyph_mm: f32,

    pub title_font_pt: f32,
    pub banner_font_pt: f32,
    pub body_font_pt: f32,
    pub footer_font_pt: f32,
    /// Banner fill, 0–255 grey level.
    pub banner_fill_grey: u8,
}

impl LayoutConfig {
    /// Vertical space available for content on one page.
    pub fn printable_height_mm(&self) -> f32 {
        self.page_height_mm - self.margin_top_mm - self.margin_bottom_mm
    }

    pub fn printable_width_mm(&self) -> f32 {
        self.page_width_mm - self.margin_left_mm - self.margin_right_mm
    }
}

/// A4 portrait, 10mm side/top margins, 15mm bottom band, Helvetica sizes
/// 16/12/10/8.
pub fn default_layout_config() -> LayoutConfig {
    LayoutConfig {
        page_width_mm: 210.0,
        page_height_mm: 297.0,
        margin_left_mm: 10.0,
        margin_right_mm: 10.0,
        margin_top_mm: 10.0,
        margin_bottom_mm: 15.0,
        body_width_chars: 100,
        bullet_width_chars: 85,
        title_height_mm: 10.0,
        banner_height_mm: 8.0,
        line_height_mm: 6.0,
        title_gap_mm: 2.0,
        banner_gap_mm: 1.0,
        entry_gap_mm: 2.0,
        section_gap_mm: 5.0,
        skill_indent_mm: 0.0,
        skill_glyph_mm: 5.0,
        detail_indent_mm: 10.0,
        detail_glyph_mm: 3.0,
        title_font_pt: 16.0,
        banner_font_pt: 12.0,
        body_font_pt: 10.0,
        footer_font_pt: 8.0,
        banner_fill_grey: 240,
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        default_layout_config()
    }
}
