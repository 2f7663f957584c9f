//! Line-based state machine for loosely-marked resume text.
//!
//! # Grammar
//! ```text
//! document  := blank* name-line (header body)*
//! name-line := first non-blank line, emphasis markers stripped
//!              (a leading backslash keeps the rest verbatim)
//! header    := "**" label ":**"            (whole line)
//! body      := line*                        (until next header)
//! entry     := (bullet | dash) head (dash | sub-bullet | plain)*
//! bullet    := "*" | "•"                    (opens an entry)
//! dash      := "- "                         (see below)
//! sub-bullet:= "+" | "◦"                    (appends to the open entry)
//! head      := title ["," org] ["(" location ")"] [" | " duration]
//! ```
//! A dash opens an entry unless the open entry was started by `*`, `•` or a
//! bold line, in which case it is a detail of that entry. Inside a head a
//! backslash escapes the next character, so `\,` `\(` `\)` `\|` are literal.
//!
//! Lines before the first header are discarded. A header-like line that is
//! not exactly `**Label:**` is still read as a header when its label is a
//! canonical section and nothing but `:` and inline text follows the label;
//! the deviation is reported. Summary and unrecognized-section lines may start
//! with a backslash to stop them being read as headers.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{Document, EducationEntry, Experience, ExtraSection, Project, SectionKind};
use crate::normalizer::contact::contact_from_lines;
use crate::normalizer::{log_warnings, Encoding, Normalized, StructuralWarning};

fn header_pattern() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| Regex::new(r"^\*\*([^*]+?):\*\*$").expect("header pattern is valid"))
}

/// A recognised header line.
#[derive(Debug, PartialEq)]
struct Header {
    label: String,
    /// Text after a malformed header (`**Skills:** Go, Rust`).
    inline: Option<String>,
    exact: bool,
}

/// Matches a trimmed line against the header grammar.
fn match_header(line: &str) -> Option<Header> {
    if let Some(caps) = header_pattern().captures(line) {
        return Some(Header {
            label: caps[1].trim().to_string(),
            inline: None,
            exact: true,
        });
    }
    loose_header(line)
}

/// `## Skills`, `**Skills**`, `**Skills:** Go`: header-like lines whose label
/// is a canonical section. The label must end the line or be followed by a
/// colon; `**Skills** matter` is content.
fn loose_header(line: &str) -> Option<Header> {
    let body = if line.starts_with('#') {
        line.trim_start_matches('#').trim_start()
    } else if line.starts_with("**") {
        line
    } else {
        return None;
    };
    let body = body.strip_prefix("**").unwrap_or(body);

    let end = body.find([':', '*']).unwrap_or(body.len());
    let label = body[..end].trim();
    if !SectionKind::from_label(label).is_canonical() {
        return None;
    }

    let rest = &body[end..];
    let rest = rest.strip_prefix("**").unwrap_or(rest).trim_start();
    let inline = match rest.strip_prefix(':') {
        Some(inline) => inline.trim_start_matches('*').trim(),
        None if rest.is_empty() => "",
        None => return None,
    };
    Some(Header {
        label: label.to_string(),
        inline: (!inline.is_empty()).then(|| inline.to_string()),
        exact: false,
    })
}

/// True when `text` contains at least one line the parser treats as a header.
pub(crate) fn has_section_header(text: &str) -> bool {
    text.lines().any(is_header_line)
}

pub(crate) fn is_header_line(line: &str) -> bool {
    match_header(line.trim()).is_some()
}

// ────────────────────────────────────────────────────────────────────────────
// Content escapes
// ────────────────────────────────────────────────────────────────────────────

const LINE_ESCAPE: char = '\\';

/// Prefixes a summary or unrecognized-section line that would otherwise be
/// read as a header (or that already starts with the escape).
pub(crate) fn escape_content_line(line: &str) -> String {
    if line.starts_with(LINE_ESCAPE) || is_header_line(line) {
        format!("{LINE_ESCAPE}{line}")
    } else {
        line.to_string()
    }
}

fn unescape_content_line(line: &str) -> &str {
    line.strip_prefix(LINE_ESCAPE).unwrap_or(line)
}

/// The name line as the parser reads it back.
fn read_name(line: &str) -> String {
    match line.strip_prefix(LINE_ESCAPE) {
        Some(escaped) => escaped.trim().to_string(),
        None => strip_emphasis(line.trim_start_matches('#')),
    }
}

/// Escapes a name whose first line would not read back unchanged.
pub(crate) fn escape_name(name: &str) -> String {
    if is_header_line(name) || read_name(name) != name {
        format!("{LINE_ESCAPE}{name}")
    } else {
        name.to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// List markers
// ────────────────────────────────────────────────────────────────────────────

/// Strips an entry-opening bullet. `**bold**` is emphasis, not a bullet.
pub(crate) fn strip_bullet(line: &str) -> Option<&str> {
    if line.starts_with("**") {
        return None;
    }
    line.strip_prefix('*')
        .or_else(|| line.strip_prefix('•'))
        .map(str::trim)
}

/// Strips a dash marker. `-` only counts when followed by whitespace.
fn strip_dash(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('-')?;
    rest.starts_with(char::is_whitespace).then(|| rest.trim())
}

fn strip_sub_bullet(line: &str) -> Option<&str> {
    line.strip_prefix('+')
        .or_else(|| line.strip_prefix('◦'))
        .map(str::trim)
}

/// Strips any list marker.
pub(crate) fn strip_list_marker(line: &str) -> Option<&str> {
    strip_bullet(line)
        .or_else(|| strip_dash(line))
        .or_else(|| strip_sub_bullet(line))
}

/// Removes bold/italic markers around entry heads and names.
fn strip_emphasis(text: &str) -> String {
    text.replace("**", "")
        .trim_matches(|c: char| c == '*' || c == '_' || c.is_whitespace())
        .to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Section splitting
// ────────────────────────────────────────────────────────────────────────────

struct OpenSection {
    kind: SectionKind,
    /// `(line_number, trimmed_text)`
    lines: Vec<(usize, String)>,
}

/// Parses markup text into a document. Never fails; anything odd becomes a
/// [`StructuralWarning`].
pub fn parse_markup(raw: &str) -> Normalized {
    let mut warnings = Vec::new();
    let mut sections: Vec<OpenSection> = Vec::new();
    let mut name: Option<String> = None;
    let mut seen_name_line = false;

    for (idx, raw_line) in raw.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();

        if !seen_name_line {
            if line.is_empty() {
                continue;
            }
            seen_name_line = true;
            if match_header(line).is_none() {
                name = Some(read_name(line));
                continue;
            }
        }

        if let Some(header) = match_header(line) {
            let kind = SectionKind::from_label(&header.label);
            if !header.exact {
                warnings.push(StructuralWarning::MalformedHeader {
                    line: line_no,
                    text: line.to_string(),
                    label: header.label.clone(),
                });
            } else if !kind.is_canonical() {
                warnings.push(StructuralWarning::UnrecognizedHeader {
                    line: line_no,
                    label: header.label.clone(),
                });
            }
            let mut lines = Vec::new();
            if let Some(inline) = header.inline {
                lines.push((line_no, inline));
            }
            sections.push(OpenSection { kind, lines });
            continue;
        }

        match sections.last_mut() {
            Some(open) => open.lines.push((line_no, line.to_string())),
            None if !line.is_empty() => warnings.push(StructuralWarning::DiscardedPreamble {
                line: line_no,
                text: line.to_string(),
            }),
            None => {}
        }
    }

    let mut document = Document::default();
    if let Some(name) = name {
        document.name = name;
    }
    for section in sections {
        apply_section(&mut document, section, &mut warnings);
    }

    log_warnings(&warnings);
    Normalized {
        document: document.normalized(),
        encoding: Encoding::Markup,
        warnings,
    }
}

/// Moves additional sections titled with a canonical label into that section,
/// reading their lines with the section's markup body grammar.
pub(crate) fn fold_canonical_extras(doc: &mut Document, warnings: &mut Vec<StructuralWarning>) {
    let extras = std::mem::take(&mut doc.additional_sections);
    for extra in extras {
        let kind = SectionKind::from_label(&extra.title);
        if !kind.is_canonical() {
            doc.additional_sections.push(extra);
            continue;
        }
        let lines = extra
            .lines
            .into_iter()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line))
            .collect();
        apply_section(doc, OpenSection { kind, lines }, warnings);
    }
}

fn apply_section(doc: &mut Document, section: OpenSection, warnings: &mut Vec<StructuralWarning>) {
    let lines = section.lines;
    match section.kind {
        SectionKind::Contact => {
            let texts: Vec<String> = lines.into_iter().map(|(_, l)| l).collect();
            contact_from_lines(&texts, &mut doc.contact_info);
        }
        SectionKind::Summary => {
            for (_, line) in lines.iter().filter(|(_, l)| !l.is_empty()) {
                if !doc.professional_summary.is_empty() {
                    doc.professional_summary.push(' ');
                }
                doc.professional_summary.push_str(unescape_content_line(line));
            }
        }
        SectionKind::Skills => {
            doc.skills.extend(
                lines
                    .iter()
                    .filter(|(_, l)| !l.is_empty())
                    .map(|(_, l)| strip_list_marker(l).unwrap_or(l).to_string()),
            );
        }
        SectionKind::Experience => {
            doc.work_experience.extend(
                collect_entries(&lines, warnings)
                    .into_iter()
                    .map(|e| {
                        let head = split_head(e.head.as_deref().unwrap_or(""));
                        Experience {
                            title: head.title,
                            company: head.org,
                            location: head.location,
                            duration: head.duration,
                            achievements: e.details,
                        }
                    }),
            );
        }
        SectionKind::Education => {
            doc.education.extend(
                collect_entries(&lines, warnings)
                    .into_iter()
                    .map(|e| {
                        let head = split_head(e.head.as_deref().unwrap_or(""));
                        EducationEntry {
                            degree: head.title,
                            institution: head.org,
                            location: head.location,
                            duration: head.duration,
                            details: e.details,
                        }
                    }),
            );
        }
        SectionKind::Projects => {
            doc.projects.extend(
                collect_entries(&lines, warnings)
                    .into_iter()
                    .map(|e| Project {
                        name: e.head,
                        details: e.details,
                    }),
            );
        }
        SectionKind::Other(title) => doc.additional_sections.push(ExtraSection {
            title,
            lines: lines
                .into_iter()
                .filter(|(_, l)| !l.is_empty())
                .map(|(_, l)| unescape_content_line(&l).to_string())
                .collect(),
        }),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry sub-grammar
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct RawEntry {
    head: Option<String>,
    details: Vec<String>,
    /// Opened by a dash, so further dashes are sibling entries.
    dashed: bool,
}

impl RawEntry {
    fn opened_by(head: &str, dashed: bool) -> Self {
        let head = strip_emphasis(head);
        RawEntry {
            head: (!head.is_empty()).then_some(head),
            details: Vec::new(),
            dashed,
        }
    }
}

fn collect_entries(lines: &[(usize, String)], warnings: &mut Vec<StructuralWarning>) -> Vec<RawEntry> {
    let mut entries: Vec<RawEntry> = Vec::new();

    for (line_no, line) in lines.iter().filter(|(_, l)| !l.is_empty()) {
        if let Some(text) = strip_dash(line) {
            match entries.last_mut() {
                Some(entry) if !entry.dashed => entry.details.push(text.to_string()),
                _ => entries.push(RawEntry::opened_by(text, true)),
            }
        } else if let Some(text) = strip_sub_bullet(line) {
            match entries.last_mut() {
                Some(entry) => entry.details.push(text.to_string()),
                None => warnings.push(StructuralWarning::OrphanSubBullet {
                    line: *line_no,
                    text: line.clone(),
                }),
            }
        } else if let Some(text) = strip_bullet(line).or_else(|| bold_head(line)) {
            entries.push(RawEntry::opened_by(text, false));
        } else {
            match entries.last_mut() {
                Some(entry) => entry.details.push(line.clone()),
                None => entries.push(RawEntry {
                    head: None,
                    details: vec![line.clone()],
                    dashed: false,
                }),
            }
        }
    }

    entries
}

/// A line that is entirely bold (`**Senior Engineer, Acme**`) opens an entry.
fn bold_head(line: &str) -> Option<&str> {
    let inner = line.strip_prefix("**")?;
    inner.contains("**").then_some(line)
}

#[derive(Debug, Default, PartialEq)]
struct EntryHead {
    title: Option<String>,
    org: Option<String>,
    location: Option<String>,
    duration: Option<String>,
}

/// Splits `Title, Org (Location) | Duration`. Without the optional suffixes
/// this is a split on the first comma. Escaped characters never split.
fn split_head(head: &str) -> EntryHead {
    let head = head.trim();
    let separator = unescaped(head)
        .filter(|&(idx, c)| {
            c == '|'
                && (idx == 0 || (head[..idx].ends_with(' ') && head[idx + 1..].starts_with(' ')))
        })
        .last();
    let (main, duration) = match separator {
        Some((idx, _)) => (&head[..idx], Some(&head[idx + 1..])),
        None => (head, None),
    };
    let (main, location) = trailing_group(main.trim());
    let (title, org) = match unescaped(main).find(|&(_, c)| c == ',') {
        Some((idx, _)) => (&main[..idx], &main[idx + 1..]),
        None => (main, ""),
    };

    EntryHead {
        title: non_empty(title),
        org: non_empty(org),
        location: location.and_then(non_empty),
        duration: duration.and_then(non_empty),
    }
}

/// Writes an entry head that [`split_head`] reads back field for field.
pub(crate) fn join_head(
    title: Option<&str>,
    org: Option<&str>,
    location: Option<&str>,
    duration: Option<&str>,
) -> String {
    let mut head = escape_head_part(title.unwrap_or_default(), &[',', '|']);
    if let Some(org) = org {
        head.push_str(", ");
        head.push_str(&escape_head_part(org, &['|']));
    }
    match location {
        Some(location) => {
            head.push_str(" (");
            head.push_str(&escape_head_part(location, &['(', ')', '|']));
            head.push(')');
        }
        // An empty group keeps a trailing `(...)` in the title or org.
        None if head.ends_with(')') => head.push_str(" ()"),
        None => {}
    }
    if let Some(duration) = duration {
        head.push_str(" | ");
        head.push_str(&escape_head_part(duration, &['|']));
    }
    head.trim().to_string()
}

fn escape_head_part(text: &str, specials: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\\' || specials.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `(byte_offset, char)` for every character not taken by a backslash escape.
fn unescaped(text: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    let mut escaped = false;
    text.char_indices().filter(move |&(_, c)| {
        if escaped {
            escaped = false;
            false
        } else if c == '\\' {
            escaped = true;
            false
        } else {
            true
        }
    })
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(chars.next().unwrap_or(c));
        } else {
            out.push(c);
        }
    }
    out
}

/// Peels a trailing balanced `( ... )` group made of unescaped parentheses.
fn trailing_group(text: &str) -> (&str, Option<&str>) {
    let parens: Vec<(usize, char)> = unescaped(text)
        .filter(|&(_, c)| c == '(' || c == ')')
        .collect();
    if !matches!(parens.last(), Some(&(idx, ')')) if idx + 1 == text.len()) {
        return (text, None);
    }
    let mut depth = 0usize;
    for &(idx, c) in parens.iter().rev() {
        if c == ')' {
            depth += 1;
            continue;
        }
        depth -= 1;
        if depth == 0 {
            return (text[..idx].trim_end(), Some(&text[idx + 1..text.len() - 1]));
        }
    }
    (text, None)
}

fn non_empty(text: &str) -> Option<String> {
    let text = unescape(text.trim());
    (!text.is_empty()).then_some(text)
}
