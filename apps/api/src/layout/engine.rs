//! Layout Engine — turns a [`Document`] into an ordered list of draw instructions.
//!
//! # Architecture
//! - `layout_document` walks the canonical sections in render order, then any
//!   additional sections, emitting a banner followed by a section body.
//! - Each section is first reduced to a [`SectionBody`]; the body variant alone
//!   decides the formatting strategy. Unrecognized sections fall into the
//!   paragraph strategy.
//! - The engine never decides page breaks. Every instruction has a fixed
//!   height (`DrawOp::height`), and the canvas driver breaks pages.

use serde::Serialize;

use crate::layout::config::LayoutConfig;
use crate::layout::wrap::wrap;
use crate::models::{ContactInfo, Document, SectionKind, CANONICAL_SECTIONS};

/// Glyph drawn in front of skill and detail bullets.
pub const BULLET_GLYPH: char = '•';

/// Separator between contact fields on the first contact line.
pub const CONTACT_SEPARATOR: &str = " | ";

// ────────────────────────────────────────────────────────────────────────────
// Draw instructions
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextStyle {
    Regular,
    Bold,
    Italic,
}

/// Glyph drawn at a line's indent; the text follows after `width`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bullet {
    pub glyph: char,
    pub width: f32,
}

/// One line of body text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    pub text: String,
    pub style: TextStyle,
    /// Distance from the left margin to the first mark on the line (the glyph
    /// when `bullet` is set, otherwise the text).
    pub indent: f32,
    pub bullet: Option<Bullet>,
}

impl TextLine {
    fn plain(text: String, style: TextStyle) -> Self {
        Self {
            text,
            style,
            indent: 0.0,
            bullet: None,
        }
    }

    /// Where the text itself starts.
    pub fn text_indent(&self) -> f32 {
        self.indent + self.bullet.map(|b| b.width).unwrap_or(0.0)
    }
}

/// A single draw instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawOp {
    /// Centered document title (the candidate's name).
    Title(String),
    /// Shaded, bordered, full-width section header.
    Banner(String),
    Line(TextLine),
    /// Vertical gap in millimetres.
    Space(f32),
}

impl DrawOp {
    /// Height the instruction consumes on the page.
    pub fn height(&self, config: &LayoutConfig) -> f32 {
        match self {
            DrawOp::Title(_) => config.title_height_mm,
            DrawOp::Banner(_) => config.banner_height_mm,
            DrawOp::Line(_) => config.line_height_mm,
            DrawOp::Space(gap) => *gap,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Section bodies
// ────────────────────────────────────────────────────────────────────────────

/// A section reduced to the shape its formatting strategy needs.
#[derive(Debug)]
enum SectionBody<'a> {
    Contact(&'a ContactInfo),
    Bullets(&'a [String]),
    Entries(Vec<EntryView<'a>>),
    /// Summary and every unrecognized section.
    Paragraphs(Vec<&'a str>),
}

/// Display view of an experience, education, or project entry.
#[derive(Debug)]
struct EntryView<'a> {
    heading: Option<&'a str>,
    subheading: Option<String>,
    duration: Option<&'a str>,
    details: &'a [String],
}

fn section_body<'a>(doc: &'a Document, kind: &SectionKind) -> SectionBody<'a> {
    match kind {
        SectionKind::Contact => SectionBody::Contact(&doc.contact_info),
        SectionKind::Summary => SectionBody::Paragraphs(vec![doc.professional_summary.as_str()]),
        SectionKind::Skills => SectionBody::Bullets(&doc.skills),
        SectionKind::Experience => SectionBody::Entries(
            doc.work_experience
                .iter()
                .map(|job| EntryView {
                    heading: job.title.as_deref(),
                    subheading: join_present(&[&job.company, &job.location], ", "),
                    duration: job.duration.as_deref(),
                    details: &job.achievements,
                })
                .collect(),
        ),
        SectionKind::Education => SectionBody::Entries(
            doc.education
                .iter()
                .map(|school| EntryView {
                    heading: school.degree.as_deref(),
                    subheading: join_present(&[&school.institution, &school.location], ", "),
                    duration: school.duration.as_deref(),
                    details: &school.details,
                })
                .collect(),
        ),
        SectionKind::Projects => SectionBody::Entries(
            doc.projects
                .iter()
                .map(|project| EntryView {
                    heading: project.name.as_deref(),
                    subheading: None,
                    duration: None,
                    details: &project.details,
                })
                .collect(),
        ),
        SectionKind::Other(label) => SectionBody::Paragraphs(
            doc.additional_sections
                .iter()
                .filter(|s| &s.title == label)
                .flat_map(|s| s.lines.iter().map(String::as_str))
                .collect(),
        ),
    }
}

/// The sections `layout_document` renders, in order.
pub fn rendered_sections(doc: &Document) -> Vec<SectionKind> {
    let mut kinds: Vec<SectionKind> = CANONICAL_SECTIONS
        .into_iter()
        .filter(|kind| *kind != SectionKind::Projects || !doc.projects.is_empty())
        .collect();
    for extra in &doc.additional_sections {
        let kind = SectionKind::Other(extra.title.clone());
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    kinds
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

/// Lays out a whole document.
pub fn layout_document(doc: &Document, config: &LayoutConfig) -> Vec<DrawOp> {
    let mut ops = vec![
        DrawOp::Title(doc.name.clone()),
        DrawOp::Space(config.title_gap_mm),
    ];

    for kind in rendered_sections(doc) {
        ops.push(DrawOp::Banner(kind.label().to_string()));
        ops.push(DrawOp::Space(config.banner_gap_mm));
        emit_body(&mut ops, section_body(doc, &kind), config);
        ops.push(DrawOp::Space(config.section_gap_mm));
    }

    ops
}

fn emit_body(ops: &mut Vec<DrawOp>, body: SectionBody<'_>, config: &LayoutConfig) {
    match body {
        SectionBody::Contact(contact) => {
            let (primary, secondary) = contact_lines(contact);
            emit_wrapped(ops, &primary, TextStyle::Regular, config);
            if let Some(secondary) = secondary {
                emit_wrapped(ops, &secondary, TextStyle::Regular, config);
            }
        }
        SectionBody::Bullets(items) => {
            for item in items {
                emit_bullet(
                    ops,
                    item,
                    config.skill_indent_mm,
                    config.skill_glyph_mm,
                    config,
                );
            }
        }
        SectionBody::Entries(entries) => {
            for entry in entries {
                if let Some(heading) = entry.heading {
                    emit_wrapped(ops, heading, TextStyle::Bold, config);
                }
                if let Some(subheading) = &entry.subheading {
                    emit_wrapped(ops, subheading, TextStyle::Italic, config);
                }
                if let Some(duration) = entry.duration {
                    emit_wrapped(ops, duration, TextStyle::Regular, config);
                }
                for detail in entry.details {
                    emit_bullet(
                        ops,
                        detail,
                        config.detail_indent_mm,
                        config.detail_glyph_mm,
                        config,
                    );
                }
                ops.push(DrawOp::Space(config.entry_gap_mm));
            }
        }
        SectionBody::Paragraphs(paragraphs) => {
            for paragraph in paragraphs {
                emit_wrapped(ops, paragraph, TextStyle::Regular, config);
            }
        }
    }
}

/// Word-wrapped lines at the left margin.
fn emit_wrapped(ops: &mut Vec<DrawOp>, text: &str, style: TextStyle, config: &LayoutConfig) {
    ops.extend(
        wrap(text, config.body_width_chars)
            .into_iter()
            .map(|line| DrawOp::Line(TextLine::plain(line, style))),
    );
}

/// Hanging-indent bullet: the glyph sits at `indent` on the first line;
/// continuation lines start where the first line's text starts.
fn emit_bullet(
    ops: &mut Vec<DrawOp>,
    text: &str,
    indent: f32,
    glyph_width: f32,
    config: &LayoutConfig,
) {
    for (i, line) in wrap(text, config.bullet_width_chars).into_iter().enumerate() {
        let line = if i == 0 {
            TextLine {
                text: line,
                style: TextStyle::Regular,
                indent,
                bullet: Some(Bullet {
                    glyph: BULLET_GLYPH,
                    width: glyph_width,
                }),
            }
        } else {
            TextLine {
                text: line,
                style: TextStyle::Regular,
                indent: indent + glyph_width,
                bullet: None,
            }
        };
        ops.push(DrawOp::Line(line));
    }
}

/// The two contact lines.
///
/// Line one joins `location, phone, email`. Line two joins the labelled
/// `linkedin, github, portfolio` and the unlabelled `additional`; it is `None`
/// when all four are absent. Absent fields leave no separator behind.
pub fn contact_lines(contact: &ContactInfo) -> (String, Option<String>) {
    let primary = join_present(&[&contact.location, &contact.phone, &contact.email], CONTACT_SEPARATOR)
        .unwrap_or_default();

    let labelled = [
        ("LinkedIn", &contact.linkedin),
        ("GitHub", &contact.github),
        ("Portfolio", &contact.portfolio),
    ];
    let mut parts: Vec<String> = labelled
        .iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| format!("{label}: {v}")))
        .collect();
    if let Some(additional) = &contact.additional {
        parts.push(additional.clone());
    }
    let secondary = (!parts.is_empty()).then(|| parts.join(CONTACT_SEPARATOR));

    (primary, secondary)
}

fn join_present(fields: &[&Option<String>], separator: &str) -> Option<String> {
    let present: Vec<&str> = fields.iter().filter_map(|f| f.as_deref()).collect();
    (!present.is_empty()).then(|| present.join(separator))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::config::default_layout_config;
    use crate::models::{EducationEntry, Experience, ExtraSection, Project};
    use crate::normalizer::parse_structured;

    fn banners(ops: &[DrawOp]) -> Vec<&str> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Banner(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn lines(ops: &[DrawOp]) -> Vec<&TextLine> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Line(line) => Some(line),
                _ => None,
            })
            .collect()
    }

    /// Ops between the banner named `label` and the next banner.
    fn section<'a>(ops: &'a [DrawOp], label: &str) -> &'a [DrawOp] {
        let start = ops
            .iter()
            .position(|op| matches!(op, DrawOp::Banner(t) if t == label))
            .expect("banner present")
            + 1;
        let end = ops[start..]
            .iter()
            .position(|op| matches!(op, DrawOp::Banner(_)))
            .map(|i| start + i)
            .unwrap_or(ops.len());
        &ops[start..end]
    }

    // ── contact ─────────────────────────────────────────────────────────────

    #[test]
    fn test_contact_only_email_has_no_separators() {
        let contact = ContactInfo {
            email: Some("jane@example.com".to_string()),
            ..Default::default()
        };
        let (primary, secondary) = contact_lines(&contact);
        assert_eq!(primary, "jane@example.com");
        assert_eq!(secondary, None);
    }

    #[test]
    fn test_contact_lines_fixed_order_and_labels() {
        let contact = ContactInfo {
            location: Some("NYC".into()),
            phone: Some("555-0100".into()),
            email: Some("j@x.io".into()),
            github: Some("github.com/j".into()),
            additional: Some("US citizen".into()),
            ..Default::default()
        };
        let (primary, secondary) = contact_lines(&contact);
        assert_eq!(primary, "NYC | 555-0100 | j@x.io");
        assert_eq!(secondary.as_deref(), Some("GitHub: github.com/j | US citizen"));
    }

    #[test]
    fn test_contact_gap_in_middle_leaves_no_double_separator() {
        let contact = ContactInfo {
            location: Some("NYC".into()),
            email: Some("j@x.io".into()),
            ..Default::default()
        };
        assert_eq!(contact_lines(&contact).0, "NYC | j@x.io");
    }

    #[test]
    fn test_empty_contact_renders_no_line() {
        let doc = parse_structured(r#"{"name":"Jane Doe","skills":["Python","Go"]}"#).unwrap();
        let ops = layout_document(&doc, &default_layout_config());
        assert_eq!(contact_lines(&doc.contact_info).0, "");
        assert!(lines(section(&ops, "Contact Information")).is_empty());
        assert!(!lines(&ops).iter().any(|l| l.text.contains('|')));
    }

    // ── section order and presence ──────────────────────────────────────────

    #[test]
    fn test_no_projects_key_means_no_projects_banner() {
        let doc = parse_structured(r#"{"name":"Jane","skills":["Go"]}"#).unwrap();
        let ops = layout_document(&doc, &default_layout_config());
        assert_eq!(
            banners(&ops),
            vec![
                "Contact Information",
                "Professional Summary",
                "Skills",
                "Work Experience",
                "Education"
            ]
        );
    }

    #[test]
    fn test_projects_banner_when_present() {
        let doc = Document {
            projects: vec![Project {
                name: Some("Compiler".into()),
                details: vec![],
            }],
            ..Default::default()
        };
        let ops = layout_document(&doc, &default_layout_config());
        assert_eq!(banners(&ops).last(), Some(&"Personal Projects"));
    }

    #[test]
    fn test_empty_skills_still_has_banner() {
        let doc = Document::default();
        let ops = layout_document(&doc, &default_layout_config());
        assert!(banners(&ops).contains(&"Skills"));
        assert!(lines(section(&ops, "Skills")).is_empty());
    }

    #[test]
    fn test_title_first() {
        let doc = Document {
            name: "Jane Doe".into(),
            ..Default::default()
        };
        let ops = layout_document(&doc, &default_layout_config());
        assert_eq!(ops[0], DrawOp::Title("Jane Doe".into()));
    }

    #[test]
    fn test_additional_sections_use_paragraph_strategy_after_canonical() {
        let doc = Document {
            additional_sections: vec![ExtraSection {
                title: "Certifications".into(),
                lines: vec!["CKA".into()],
            }],
            ..Default::default()
        };
        let ops = layout_document(&doc, &default_layout_config());
        assert_eq!(banners(&ops).last(), Some(&"Certifications"));
        let body = lines(section(&ops, "Certifications"));
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].text, "CKA");
        assert_eq!(body[0].bullet, None);
    }

    #[test]
    fn test_extra_section_named_like_canonical_renders_one_banner() {
        let doc = parse_structured(
            r#"{"name": "Jane", "skills": ["Rust"],
                "additional_sections": [{"title": "Skills", "lines": ["* Go"]}]}"#,
        )
        .unwrap();
        let ops = layout_document(&doc, &default_layout_config());
        assert_eq!(banners(&ops).iter().filter(|b| **b == "Skills").count(), 1);
        let body: Vec<&str> = lines(section(&ops, "Skills"))
            .iter()
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(body, vec!["Rust", "Go"]);
    }

    // ── strategies ──────────────────────────────────────────────────────────

    #[test]
    fn test_skills_are_bulleted() {
        let doc = Document {
            skills: vec!["Rust".into(), "Go".into()],
            ..Default::default()
        };
        let ops = layout_document(&doc, &default_layout_config());
        let body = lines(section(&ops, "Skills"));
        assert_eq!(body.len(), 2);
        assert!(body.iter().all(|l| l.bullet.map(|b| b.glyph) == Some(BULLET_GLYPH)));
        assert_eq!(body[1].text, "Go");
    }

    #[test]
    fn test_experience_entry_lines() {
        let doc = Document {
            work_experience: vec![Experience {
                title: Some("Engineer".into()),
                company: Some("Acme".into()),
                location: Some("Berlin".into()),
                duration: Some("2020 - 2023".into()),
                achievements: vec!["Shipped it".into()],
            }],
            ..Default::default()
        };
        let config = default_layout_config();
        let ops = layout_document(&doc, &config);
        let body = section(&ops, "Work Experience");
        let text: Vec<(&str, TextStyle)> = lines(body).iter().map(|l| (l.text.as_str(), l.style)).collect();
        assert_eq!(
            text,
            vec![
                ("Engineer", TextStyle::Bold),
                ("Acme, Berlin", TextStyle::Italic),
                ("2020 - 2023", TextStyle::Regular),
                ("Shipped it", TextStyle::Regular),
            ]
        );
        assert!(body.contains(&DrawOp::Space(config.entry_gap_mm)));
    }

    #[test]
    fn test_absent_entry_fields_emit_nothing() {
        let doc = Document {
            education: vec![EducationEntry {
                degree: Some("BSc".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let ops = layout_document(&doc, &default_layout_config());
        let body = lines(section(&ops, "Education"));
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].text, "BSc");
        assert!(!lines(&ops).iter().any(|l| l.text.contains("None")));
    }

    #[test]
    fn test_projects_have_no_company_or_duration_lines() {
        let doc = Document {
            projects: vec![Project {
                name: Some("Compiler".into()),
                details: vec!["Wrote a parser".into()],
            }],
            ..Default::default()
        };
        let ops = layout_document(&doc, &default_layout_config());
        let body = lines(section(&ops, "Personal Projects"));
        assert_eq!(body.len(), 2);
        assert_eq!(body[0].style, TextStyle::Bold);
        assert!(body[1].bullet.is_some());
    }

    #[test]
    fn test_hanging_indent_continuation_is_deeper() {
        let long = "Reduced infrastructure spend by forty percent by consolidating \
                    twelve services onto a shared Kubernetes platform with autoscaling \
                    and workload-aware bin packing";
        let doc = Document {
            work_experience: vec![Experience {
                title: Some("SRE".into()),
                achievements: vec![long.into()],
                ..Default::default()
            }],
            ..Default::default()
        };
        let config = default_layout_config();
        let ops = layout_document(&doc, &config);
        let bullet_lines: Vec<&TextLine> = lines(section(&ops, "Work Experience"))
            .into_iter()
            .filter(|l| l.style == TextStyle::Regular)
            .collect();
        assert!(bullet_lines.len() >= 2);
        let first = bullet_lines[0];
        assert!(first.bullet.is_some());
        for cont in &bullet_lines[1..] {
            assert!(cont.bullet.is_none());
            assert!(cont.indent > first.indent);
            assert_eq!(cont.indent, first.text_indent());
        }
        for line in &bullet_lines {
            assert!(line.text.chars().count() <= config.bullet_width_chars);
        }
    }

    #[test]
    fn test_summary_is_wrapped_paragraph() {
        let doc = Document {
            professional_summary: "word ".repeat(60),
            ..Default::default()
        };
        let config = default_layout_config();
        let ops = layout_document(&doc, &config);
        let body = lines(section(&ops, "Professional Summary"));
        assert!(body.len() > 1);
        assert!(body.iter().all(|l| l.bullet.is_none() && l.indent == 0.0));
        assert!(body
            .iter()
            .all(|l| l.text.chars().count() <= config.body_width_chars));
    }

    #[test]
    fn test_layout_is_deterministic() {
        let doc = parse_structured(
            r#"{"name":"A","skills":["x"],"work_experience":[{"title":"t","achievements":["a b c"]}]}"#,
        )
        .unwrap();
        let config = default_layout_config();
        assert_eq!(layout_document(&doc, &config), layout_document(&doc, &config));
    }

    #[test]
    fn test_op_heights() {
        let config = default_layout_config();
        assert_eq!(DrawOp::Banner("x".into()).height(&config), config.banner_height_mm);
        assert_eq!(DrawOp::Space(3.5).height(&config), 3.5);
    }
}
