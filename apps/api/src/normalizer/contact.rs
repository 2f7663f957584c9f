//! Classifies "Contact Information" markup lines into [`ContactInfo`] fields.
//!
//! A line that starts with a label (`Location: Berlin | Remote`) fills that
//! field with the rest of the line. Otherwise lines are split on `|` into
//! tokens; a token may name its field with a label (`Email: jane@x.io`) and
//! unlabelled tokens are sorted by shape. Anything that cannot claim a free
//! field lands in `additional`.

use crate::models::ContactInfo;
use crate::normalizer::markup::strip_list_marker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Location,
    Phone,
    Email,
    Linkedin,
    Github,
    Portfolio,
    Additional,
}

/// Labels written by the markup serializer, in field order.
pub(crate) const CONTACT_LABELS: [(&str, &str); 7] = [
    ("location", "Location"),
    ("phone", "Phone"),
    ("email", "Email"),
    ("linkedin", "LinkedIn"),
    ("github", "GitHub"),
    ("portfolio", "Portfolio"),
    ("additional", "Additional"),
];

/// Builds contact info from the trimmed body lines of a contact section.
pub(crate) fn contact_from_lines(lines: &[String], contact: &mut ContactInfo) {
    for line in lines {
        let line = strip_list_marker(line).unwrap_or(line).replace("**", "");
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let tokens: Vec<&str> = line.split('|').map(str::trim).filter(|t| !t.is_empty()).collect();

        // A leading label owns the whole line unless a later token carries a
        // label of its own. `Additional:` always owns it.
        if let Some((field, value)) = labelled(line) {
            if field == Field::Additional || tokens.iter().skip(1).all(|t| labelled(t).is_none()) {
                assign(contact, field, value);
                continue;
            }
        }

        for token in tokens {
            match labelled(token) {
                Some((field, value)) => assign(contact, field, value),
                None => {
                    let field = classify(token, contact);
                    assign(contact, field, token);
                }
            }
        }
    }
}

/// Splits `Label: value` when the label names a contact field.
fn labelled(token: &str) -> Option<(Field, &str)> {
    let (label, value) = token.split_once(':')?;
    let field = match label.trim().to_ascii_lowercase().as_str() {
        "location" | "address" => Field::Location,
        "phone" | "tel" | "mobile" => Field::Phone,
        "email" | "e-mail" => Field::Email,
        "linkedin" => Field::Linkedin,
        "github" => Field::Github,
        "portfolio" | "website" => Field::Portfolio,
        "additional" => Field::Additional,
        _ => return None,
    };
    Some((field, value.trim()))
}

/// Picks a field for an unlabelled token from its shape.
fn classify(token: &str, contact: &ContactInfo) -> Field {
    let lower = token.to_ascii_lowercase();
    if token.contains('@') && !token.contains(char::is_whitespace) {
        Field::Email
    } else if lower.contains("linkedin.com") {
        Field::Linkedin
    } else if lower.contains("github.com") {
        Field::Github
    } else if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("www.") {
        Field::Portfolio
    } else if looks_like_phone(token) {
        Field::Phone
    } else if contact.location.is_none() {
        Field::Location
    } else {
        Field::Additional
    }
}

fn looks_like_phone(token: &str) -> bool {
    let digits = token.chars().filter(char::is_ascii_digit).count();
    digits >= 7
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | '.' | ' ' | 'x'))
}

/// Stores `value` in `field`; an occupied field pushes the value to `additional`.
fn assign(contact: &mut ContactInfo, field: Field, value: &str) {
    if value.is_empty() {
        return;
    }
    let slot = match field {
        Field::Location => &mut contact.location,
        Field::Phone => &mut contact.phone,
        Field::Email => &mut contact.email,
        Field::Linkedin => &mut contact.linkedin,
        Field::Github => &mut contact.github,
        Field::Portfolio => &mut contact.portfolio,
        Field::Additional => {
            push_additional(contact, value);
            return;
        }
    };
    if slot.is_none() {
        *slot = Some(value.to_string());
    } else {
        push_additional(contact, value);
    }
}

fn push_additional(contact: &mut ContactInfo, value: &str) {
    contact.additional = Some(match contact.additional.take() {
        Some(existing) => format!("{existing} | {value}"),
        None => value.to_string(),
    });
}
