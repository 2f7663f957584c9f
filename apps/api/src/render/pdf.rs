// PDF backend for the Canvas trait, built on lopdf.
// Builds the object graph in memory and writes it out once all pages are done.

use std::io::Write;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, ObjectId, Stream, StringFormat};
use tracing::info;

use crate::layout::{layout_document, LayoutConfig, TextLine, TextStyle};
use crate::models::Document;
use crate::render::metrics::get_metrics;
use crate::render::{paginate, Canvas, RenderError};

const PT_PER_MM: f32 = 72.0 / 25.4;

fn mm_to_pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

/// Resource names of the three Helvetica faces.
fn font_resource(style: TextStyle) -> &'static str {
    match style {
        TextStyle::Regular => "F1",
        TextStyle::Bold => "F2",
        TextStyle::Italic => "F3",
    }
}

/// An in-memory PDF canvas: A4 pages, Helvetica, grey banners, "Page N" footers.
pub struct PdfCanvas {
    document: lopdf::Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    page_ids: Vec<ObjectId>,
    content: Content,
    config: LayoutConfig,
}

impl PdfCanvas {
    pub fn new(config: &LayoutConfig) -> Self {
        let mut document = lopdf::Document::with_version("1.5");
        let pages_id = document.new_object_id();
        let resources_id = document.new_object_id();

        let mut fonts = lopdf::Dictionary::new();
        for (name, base_font) in [
            ("F1", "Helvetica"),
            ("F2", "Helvetica-Bold"),
            ("F3", "Helvetica-Oblique"),
        ] {
            let font_id = document.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => base_font,
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(name, font_id);
        }
        document
            .objects
            .insert(resources_id, Object::Dictionary(dictionary! { "Font" => fonts }));

        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0,
            }),
        );
        let catalog_id = document.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        document.trailer.set("Root", catalog_id);

        Self {
            document,
            pages_id,
            resources_id,
            page_ids: Vec::new(),
            content: Content { operations: vec![] },
            config: config.clone(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Finalizes the page tree and writes the document to `writer`.
    pub fn save_to<W: Write>(mut self, writer: &mut W) -> Result<(), RenderError> {
        if let Some(Object::Dictionary(pages_dict)) = self.document.objects.get_mut(&self.pages_id) {
            let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
            pages_dict.set("Kids", kids);
            pages_dict.set("Count", self.page_ids.len() as i64);
        }
        self.document.save_to(writer)?;
        Ok(())
    }

    fn page_height_pt(&self) -> f32 {
        mm_to_pt(self.config.page_height_mm)
    }

    /// Baseline of text vertically centered in a cell that starts `y` mm below
    /// the top of the printable area.
    fn baseline_pt(&self, y: f32, cell_height_mm: f32, font_pt: f32) -> f32 {
        let cell_middle_mm = self.config.margin_top_mm + y + cell_height_mm / 2.0;
        self.page_height_pt() - mm_to_pt(cell_middle_mm) - 0.3 * font_pt
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    fn text(&mut self, x_pt: f32, y_pt: f32, style: TextStyle, font_pt: f32, text: &str) {
        self.push("BT", vec![]);
        self.push("Tf", vec![font_resource(style).into(), font_pt.into()]);
        self.push("Td", vec![x_pt.into(), y_pt.into()]);
        self.push(
            "Tj",
            vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
        );
        self.push("ET", vec![]);
    }

    fn centered_x_pt(&self, text: &str, style: TextStyle, font_pt: f32) -> f32 {
        let width = get_metrics(style).measure_pt(text, font_pt);
        let area = mm_to_pt(self.config.printable_width_mm());
        mm_to_pt(self.config.margin_left_mm) + ((area - width) / 2.0).max(0.0)
    }
}

impl Canvas for PdfCanvas {
    fn printable_height(&self) -> f32 {
        self.config.printable_height_mm()
    }

    fn page_start(&mut self, _page: u32) -> Result<(), RenderError> {
        self.content = Content { operations: vec![] };
        self.push("rg", vec![0.into(), 0.into(), 0.into()]);
        Ok(())
    }

    fn page_end(&mut self, page: u32) -> Result<(), RenderError> {
        let footer = format!("Page {page}");
        let font_pt = self.config.footer_font_pt;
        let x = self.centered_x_pt(&footer, TextStyle::Italic, font_pt);
        let y = mm_to_pt(self.config.margin_bottom_mm / 2.0);
        self.text(x, y, TextStyle::Italic, font_pt, &footer);

        let content = std::mem::replace(&mut self.content, Content { operations: vec![] });
        let content_id = self
            .document
            .add_object(Stream::new(lopdf::Dictionary::new(), content.encode()?));
        let page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                mm_to_pt(self.config.page_width_mm).into(),
                self.page_height_pt().into(),
            ],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        };
        let page_id = self.document.add_object(page_dict);
        self.page_ids.push(page_id);
        Ok(())
    }

    fn draw_title(&mut self, y: f32, text: &str) -> Result<(), RenderError> {
        let font_pt = self.config.title_font_pt;
        let x = self.centered_x_pt(text, TextStyle::Bold, font_pt);
        let baseline = self.baseline_pt(y, self.config.title_height_mm, font_pt);
        self.text(x, baseline, TextStyle::Bold, font_pt, text);
        Ok(())
    }

    fn draw_banner(&mut self, y: f32, text: &str) -> Result<(), RenderError> {
        let grey = f32::from(self.config.banner_fill_grey) / 255.0;
        let height_mm = self.config.banner_height_mm;
        let bottom = self.page_height_pt() - mm_to_pt(self.config.margin_top_mm + y + height_mm);

        self.push("rg", vec![grey.into(), grey.into(), grey.into()]);
        self.push("RG", vec![0.into(), 0.into(), 0.into()]);
        self.push("w", vec![mm_to_pt(0.2).into()]);
        self.push(
            "re",
            vec![
                mm_to_pt(self.config.margin_left_mm).into(),
                bottom.into(),
                mm_to_pt(self.config.printable_width_mm()).into(),
                mm_to_pt(height_mm).into(),
            ],
        );
        self.push("B", vec![]);
        self.push("rg", vec![0.into(), 0.into(), 0.into()]);

        let font_pt = self.config.banner_font_pt;
        let x = mm_to_pt(self.config.margin_left_mm + 1.0);
        let baseline = self.baseline_pt(y, height_mm, font_pt);
        self.text(x, baseline, TextStyle::Bold, font_pt, text);
        Ok(())
    }

    fn draw_line(&mut self, y: f32, line: &TextLine) -> Result<(), RenderError> {
        let font_pt = self.config.body_font_pt;
        let baseline = self.baseline_pt(y, self.config.line_height_mm, font_pt);
        let left = self.config.margin_left_mm;

        if let Some(bullet) = line.bullet {
            let x = mm_to_pt(left + line.indent);
            self.text(x, baseline, TextStyle::Regular, font_pt, &bullet.glyph.to_string());
        }
        let x = mm_to_pt(left + line.text_indent());
        self.text(x, baseline, line.style, font_pt, &line.text);
        Ok(())
    }
}

/// Renders `doc` as a PDF into `writer`. Returns the number of pages.
pub fn render_pdf<W: Write>(
    doc: &Document,
    config: &LayoutConfig,
    writer: &mut W,
) -> Result<u32, RenderError> {
    let ops = layout_document(doc, config);
    let mut canvas = PdfCanvas::new(config);
    let pages = paginate(&ops, &mut canvas, config)?;
    canvas.save_to(writer)?;
    info!(pages, ops = ops.len(), name = %doc.name, "Rendered PDF");
    Ok(pages)
}

/// Encodes text for a WinAnsiEncoding base-14 font. Characters with no
/// WinAnsi code point become `?`.
pub fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c {
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}
