//! Canonical in-memory resume document.
//!
//! Both input encodings (JSON and loosely-marked text) normalize into
//! [`Document`]; the layout engine and the markup serializer consume it.
//! Optional fields are `Option<String>` and never hold an empty string once a
//! document has gone through [`Document::normalized`].

use serde::{Deserialize, Deserializer, Serialize};

/// Name used when the input carries no name at all.
pub const DEFAULT_NAME: &str = "Customized Resume";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default = "default_name", deserialize_with = "name_or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact_info: ContactInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub professional_summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub work_experience: Vec<Experience>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<EducationEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
    /// Sections under labels outside the canonical table, kept verbatim.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_sections: Vec<ExtraSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub details: Vec<String>,
}

/// A section whose header label is not in the canonical table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraSection {
    pub title: String,
    #[serde(default)]
    pub lines: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Construction and normalization
// ────────────────────────────────────────────────────────────────────────────

impl Default for Document {
    fn default() -> Self {
        Self {
            name: default_name(),
            contact_info: ContactInfo::default(),
            professional_summary: String::new(),
            skills: Vec::new(),
            work_experience: Vec::new(),
            education: Vec::new(),
            projects: Vec::new(),
            additional_sections: Vec::new(),
        }
    }
}

impl Document {
    /// Trims every field, turns blank optionals into `None`, drops blank list
    /// items, and restores the default name when the name is blank.
    pub fn normalized(self) -> Self {
        let name = self.name.trim();
        Self {
            name: if name.is_empty() {
                default_name()
            } else {
                name.to_string()
            },
            contact_info: self.contact_info.normalized(),
            professional_summary: self.professional_summary.trim().to_string(),
            skills: clean_list(self.skills),
            work_experience: self
                .work_experience
                .into_iter()
                .map(Experience::normalized)
                .collect(),
            education: self
                .education
                .into_iter()
                .map(EducationEntry::normalized)
                .collect(),
            projects: self.projects.into_iter().map(Project::normalized).collect(),
            additional_sections: self
                .additional_sections
                .into_iter()
                .map(|s| ExtraSection {
                    title: s.title.trim().to_string(),
                    lines: clean_list(s.lines),
                })
                .collect(),
        }
    }
}

impl ContactInfo {
    fn normalized(self) -> Self {
        Self {
            location: clean(self.location),
            phone: clean(self.phone),
            email: clean(self.email),
            linkedin: clean(self.linkedin),
            github: clean(self.github),
            portfolio: clean(self.portfolio),
            additional: clean(self.additional),
        }
    }

    /// True when every field is absent.
    pub fn is_empty(&self) -> bool {
        [
            &self.location,
            &self.phone,
            &self.email,
            &self.linkedin,
            &self.github,
            &self.portfolio,
            &self.additional,
        ]
        .iter()
        .all(|f| f.is_none())
    }

    pub fn location(&self) -> &str {
        display(&self.location)
    }

    pub fn phone(&self) -> &str {
        display(&self.phone)
    }

    pub fn email(&self) -> &str {
        display(&self.email)
    }

    pub fn linkedin(&self) -> &str {
        display(&self.linkedin)
    }

    pub fn github(&self) -> &str {
        display(&self.github)
    }

    pub fn portfolio(&self) -> &str {
        display(&self.portfolio)
    }

    pub fn additional(&self) -> &str {
        display(&self.additional)
    }
}

impl Experience {
    fn normalized(self) -> Self {
        Self {
            title: clean(self.title),
            company: clean(self.company),
            location: clean(self.location),
            duration: clean(self.duration),
            achievements: clean_list(self.achievements),
        }
    }

    pub fn title(&self) -> &str {
        display(&self.title)
    }

    pub fn company(&self) -> &str {
        display(&self.company)
    }

    pub fn location(&self) -> &str {
        display(&self.location)
    }

    pub fn duration(&self) -> &str {
        display(&self.duration)
    }
}

impl EducationEntry {
    fn normalized(self) -> Self {
        Self {
            degree: clean(self.degree),
            institution: clean(self.institution),
            location: clean(self.location),
            duration: clean(self.duration),
            details: clean_list(self.details),
        }
    }

    pub fn degree(&self) -> &str {
        display(&self.degree)
    }

    pub fn institution(&self) -> &str {
        display(&self.institution)
    }

    pub fn location(&self) -> &str {
        display(&self.location)
    }

    pub fn duration(&self) -> &str {
        display(&self.duration)
    }
}

impl Project {
    fn normalized(self) -> Self {
        Self {
            name: clean(self.name),
            details: clean_list(self.details),
        }
    }

    pub fn name(&self) -> &str {
        display(&self.name)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn display(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or("")
}

/// Trims an optional field; blank values become `None`.
pub(crate) fn clean(field: Option<String>) -> Option<String> {
    field.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(|item| clean(Some(item)))
        .collect()
}

/// `null` is treated like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn name_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_name))
}
