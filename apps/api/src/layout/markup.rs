//! Canonical markup serializer: the inverse of `normalizer::parse_markup`.
//!
//! Output is deterministic: fixed section order, `**Label:**` headers, `*` for
//! entries and skills, `+` for entry details. Contact fields are written one
//! per line with their label so they re-parse into the same slots. Entry heads
//! and header-like content lines carry backslash escapes where needed.

use std::fmt::Write;

use crate::models::{ContactInfo, Document, SectionKind, CANONICAL_SECTIONS};
use crate::normalizer::contact::CONTACT_LABELS;
use crate::normalizer::markup::{escape_content_line, escape_name, join_head};

/// Renders `doc` as markup. Empty canonical sections are omitted.
pub fn serialize_markup(doc: &Document) -> String {
    let mut out = String::new();
    out.push_str(&escape_name(&doc.name));
    out.push('\n');

    for kind in CANONICAL_SECTIONS {
        let body = canonical_body(doc, &kind);
        if !body.is_empty() {
            push_section(&mut out, kind.label(), &body);
        }
    }
    for extra in &doc.additional_sections {
        let lines: Vec<String> = extra.lines.iter().map(|l| escape_content_line(l)).collect();
        push_section(&mut out, &extra.title, &lines);
    }

    out
}

fn push_section(out: &mut String, label: &str, body: &[String]) {
    // `writeln!` into a String cannot fail.
    let _ = writeln!(out, "\n**{label}:**");
    for line in body {
        out.push_str(line);
        out.push('\n');
    }
}

fn canonical_body(doc: &Document, kind: &SectionKind) -> Vec<String> {
    match kind {
        SectionKind::Contact => contact_body(&doc.contact_info),
        SectionKind::Summary => doc
            .professional_summary
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| escape_content_line(l.trim()))
            .collect(),
        SectionKind::Skills => doc.skills.iter().map(|s| format!("* {s}")).collect(),
        SectionKind::Experience => doc
            .work_experience
            .iter()
            .flat_map(|job| {
                entry_lines(
                    join_head(
                        job.title.as_deref(),
                        job.company.as_deref(),
                        job.location.as_deref(),
                        job.duration.as_deref(),
                    ),
                    &job.achievements,
                )
            })
            .collect(),
        SectionKind::Education => doc
            .education
            .iter()
            .flat_map(|school| {
                entry_lines(
                    join_head(
                        school.degree.as_deref(),
                        school.institution.as_deref(),
                        school.location.as_deref(),
                        school.duration.as_deref(),
                    ),
                    &school.details,
                )
            })
            .collect(),
        SectionKind::Projects => doc
            .projects
            .iter()
            .flat_map(|p| entry_lines(p.name.clone().unwrap_or_default(), &p.details))
            .collect(),
        SectionKind::Other(_) => Vec::new(),
    }
}

fn contact_body(contact: &ContactInfo) -> Vec<String> {
    let fields = [
        &contact.location,
        &contact.phone,
        &contact.email,
        &contact.linkedin,
        &contact.github,
        &contact.portfolio,
        &contact.additional,
    ];
    CONTACT_LABELS
        .iter()
        .zip(fields)
        .filter_map(|((_, label), value)| value.as_deref().map(|v| format!("{label}: {v}")))
        .collect()
}

fn entry_lines(head: String, details: &[String]) -> Vec<String> {
    let mut lines = Vec::with_capacity(details.len() + 1);
    lines.push(if head.is_empty() {
        "*".to_string()
    } else {
        format!("* {head}")
    });
    lines.extend(details.iter().map(|d| format!("+ {d}")));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EducationEntry, Experience, ExtraSection, Project};
    use crate::normalizer::parse_markup;

    fn full_document() -> Document {
        Document {
            name: "Jane Doe".into(),
            contact_info: ContactInfo {
                location: Some("San Francisco, CA".into()),
                phone: Some("(555) 123-4567".into()),
                email: Some("jane@example.com".into()),
                linkedin: Some("linkedin.com/in/jane".into()),
                github: Some("github.com/jane".into()),
                portfolio: Some("https://jane.dev".into()),
                additional: Some("US citizen | Open to relocation".into()),
            },
            professional_summary: "Backend engineer with eight years of distributed systems work.".into(),
            skills: vec!["Rust".into(), "Go".into(), "Kubernetes, Terraform".into()],
            work_experience: vec![
                Experience {
                    title: Some("Senior Engineer".into()),
                    company: Some("Acme Corp".into()),
                    location: Some("Remote".into()),
                    duration: Some("2020 - Present".into()),
                    achievements: vec![
                        "Cut p99 latency by 40%".into(),
                        "Led a team of five".into(),
                    ],
                },
                Experience {
                    title: Some("Engineer".into()),
                    company: Some("Beta".into()),
                    ..Default::default()
                },
            ],
            education: vec![EducationEntry {
                degree: Some("B.S. Computer Science".into()),
                institution: Some("MIT".into()),
                location: Some("Cambridge, MA".into()),
                duration: Some("2014 - 2018".into()),
                details: vec!["GPA 3.9".into()],
            }],
            projects: vec![Project {
                name: Some("Toy compiler, in Rust".into()),
                details: vec!["Parser and codegen".into()],
            }],
            additional_sections: vec![ExtraSection {
                title: "Certifications".into(),
                lines: vec!["CKA".into()],
            }],
        }
    }

    #[test]
    fn test_full_document_round_trips() {
        let doc = full_document();
        let parsed = parse_markup(&serialize_markup(&doc));
        assert_eq!(parsed.document, doc);
    }

    #[test]
    fn test_sparse_entries_round_trip() {
        let doc = Document {
            name: "Sam".into(),
            work_experience: vec![
                Experience {
                    duration: Some("2019".into()),
                    ..Default::default()
                },
                Experience {
                    company: Some("Gamma".into()),
                    achievements: vec!["Did a thing".into()],
                    ..Default::default()
                },
            ],
            education: vec![EducationEntry {
                location: Some("Paris".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let parsed = parse_markup(&serialize_markup(&doc));
        assert_eq!(parsed.document, doc);
        assert!(parsed.warnings.iter().all(|w| !matches!(
            w,
            crate::normalizer::StructuralWarning::OrphanSubBullet { .. }
        )));
    }

    #[test]
    fn test_awkward_entry_heads_round_trip() {
        let titles = [None, Some("Software Engineer, Backend"), Some("Intern (Summer)"), Some("R&D | Infra")];
        let orgs = [None, Some("Acme (UK)"), Some("Acme, Inc.")];
        let locations = [None, Some("London (HQ)"), Some("Paris)")];
        let durations = [None, Some("2020 | 2021")];

        let mut jobs = Vec::new();
        let mut schools = Vec::new();
        for title in titles {
            for org in orgs {
                for location in locations {
                    for duration in durations {
                        jobs.push(Experience {
                            title: title.map(Into::into),
                            company: org.map(Into::into),
                            location: location.map(Into::into),
                            duration: duration.map(Into::into),
                            achievements: vec!["Shipped it".into()],
                        });
                        schools.push(EducationEntry {
                            degree: title.map(|t| format!("B.S., {t}")),
                            institution: org.map(Into::into),
                            location: location.map(Into::into),
                            duration: duration.map(Into::into),
                            details: Vec::new(),
                        });
                    }
                }
            }
        }
        let doc = Document {
            name: "Jane Doe".into(),
            work_experience: jobs,
            education: schools,
            ..Default::default()
        };

        let parsed = parse_markup(&serialize_markup(&doc));
        assert_eq!(parsed.document.work_experience, doc.work_experience);
        assert_eq!(parsed.document.education, doc.education);
    }

    #[test]
    fn test_header_like_content_round_trips() {
        let doc = Document {
            name: "Jane Doe".into(),
            contact_info: ContactInfo {
                location: Some("Berlin | Remote".into()),
                ..Default::default()
            },
            professional_summary: "**Skills** matter to me".into(),
            additional_sections: vec![ExtraSection {
                title: "Hobbies".into(),
                lines: vec![
                    "## Skills".into(),
                    "**Awards:**".into(),
                    "\\escaped already".into(),
                    "* chess".into(),
                ],
            }],
            ..Default::default()
        };
        let parsed = parse_markup(&serialize_markup(&doc));
        assert_eq!(parsed.document, doc);

        let summary_only = Document {
            name: "Jane Doe".into(),
            professional_summary: "**Skills**".into(),
            ..Default::default()
        };
        assert_eq!(parse_markup(&serialize_markup(&summary_only)).document, summary_only);
    }

    #[test]
    fn test_default_document_round_trips() {
        let doc = Document::default();
        assert_eq!(parse_markup(&serialize_markup(&doc)).document, doc);
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let doc = Document {
            name: "Jane".into(),
            skills: vec!["Go".into()],
            ..Default::default()
        };
        assert_eq!(serialize_markup(&doc), "Jane\n\n**Skills:**\n* Go\n");
    }

    #[test]
    fn test_fixed_order_and_glyphs() {
        let text = serialize_markup(&full_document());
        let headers: Vec<&str> = text.lines().filter(|l| l.starts_with("**")).collect();
        assert_eq!(
            headers,
            vec![
                "**Contact Information:**",
                "**Professional Summary:**",
                "**Skills:**",
                "**Work Experience:**",
                "**Education:**",
                "**Personal Projects:**",
                "**Certifications:**",
            ]
        );
        assert!(text.contains("* Senior Engineer, Acme Corp (Remote) | 2020 - Present\n+ Cut p99 latency by 40%\n"));
        assert!(text.contains("Email: jane@example.com\n"));
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let doc = full_document();
        assert_eq!(serialize_markup(&doc), serialize_markup(&doc));
    }
}
