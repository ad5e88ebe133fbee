use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::completion::SectionKind;

// ────────────────────────────────────────────────────────────────────────────
// Resume data
// ────────────────────────────────────────────────────────────────────────────

/// The editor's working copy of a resume. Every field is optional; a missing
/// section is what makes a step incomplete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    pub basics: Option<Basics>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<Skill>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<EducationEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub projects: Vec<ProjectEntry>,
    pub personal_statement: Option<String>,
    pub declaration: Option<Declaration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Basics {
    pub name: Option<String>,
    /// Headline shown under the name, e.g. "Backend Engineer".
    pub label: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub summary: Option<String>,
}

/// Skills arrive either as bare strings or as structured entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Skill {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        level: Option<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        keywords: Vec<String>,
    },
}

impl Skill {
    pub fn name(&self) -> &str {
        match self {
            Skill::Name(name) => name,
            Skill::Detailed { name, .. } => name,
        }
    }

    pub fn level(&self) -> Option<&str> {
        match self {
            Skill::Name(_) => None,
            Skill::Detailed { level, .. } => level.as_deref(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        match self {
            Skill::Name(_) => &[],
            Skill::Detailed { keywords, .. } => keywords,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub company: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub current: bool,
    pub summary: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub institution: Option<String>,
    /// Field of study.
    pub area: Option<String>,
    /// Degree, e.g. "BSc".
    pub study_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub score: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub highlights: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Declaration {
    pub text: Option<String>,
    pub place: Option<String>,
    pub date: Option<String>,
}

/// Reads an explicit `null` the same as a missing key. Editors send `null`
/// for sections the user has not touched yet.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ResumeData {
    /// Describes which parts of the resume are populated without revealing
    /// any of their contents. Safe for logs and error messages.
    pub fn redacted_summary(&self) -> String {
        let mut parts = Vec::new();

        match &self.basics {
            Some(basics) => {
                let present: Vec<&str> = [
                    ("name", &basics.name),
                    ("label", &basics.label),
                    ("email", &basics.email),
                    ("phone", &basics.phone),
                    ("location", &basics.location),
                    ("website", &basics.website),
                    ("summary", &basics.summary),
                ]
                .iter()
                .filter(|(_, value)| value.as_deref().is_some_and(|v| !v.is_empty()))
                .map(|(field, _)| *field)
                .collect();
                parts.push(format!("basics{{{}}}", present.join(",")));
            }
            None => parts.push("basics: absent".to_string()),
        }

        parts.push(format!("skills x{}", self.skills.len()));
        parts.push(format!("experience x{}", self.experience.len()));
        parts.push(format!("education x{}", self.education.len()));
        parts.push(format!("projects x{}", self.projects.len()));
        parts.push(format!(
            "personalStatement: {}",
            presence(self.personal_statement.as_deref())
        ));
        parts.push(format!(
            "declaration: {}",
            presence(self.declaration.as_ref().and_then(|d| d.text.as_deref()))
        ));

        parts.join(", ")
    }
}

fn presence(value: Option<&str>) -> &'static str {
    match value {
        Some(v) if !v.is_empty() => "present",
        Some(_) => "empty",
        None => "absent",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resume identity
// ────────────────────────────────────────────────────────────────────────────

const MAX_RESUME_ID_LEN: usize = 128;

#[derive(Debug, Error, PartialEq)]
#[error("invalid resume id: must be 1-{MAX_RESUME_ID_LEN} characters of [A-Za-z0-9_-]")]
pub struct InvalidResumeId;

/// Identity of a resume record owned by the data-access layer. It is the only
/// caller input that ends up in artifact file names, so it is restricted to
/// characters that cannot escape the artifact directories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResumeId(String);

impl ResumeId {
    pub fn parse(raw: &str) -> Result<Self, InvalidResumeId> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_RESUME_ID_LEN
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidResumeId)
        }
    }
}

impl fmt::Display for ResumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Editor steps
// ────────────────────────────────────────────────────────────────────────────

/// One step of the multi-step editor. Owned by the UI; only `id` matters here.
/// The id is kept as sent so results can be keyed the way the editor knows them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDefinition {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl StepDefinition {
    /// The section this step edits.
    pub fn kind(&self) -> SectionKind {
        SectionKind::from(self.id.as_str())
    }
}

#[cfg(test)]
impl StepDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_partial_resume() {
        let data: ResumeData = serde_json::from_value(json!({
            "basics": { "name": "A", "email": "a@x.com" },
            "skills": ["x", { "name": "Rust", "level": "expert" }],
            "personalStatement": "Hello"
        }))
        .unwrap();

        assert_eq!(data.skills.len(), 2);
        assert_eq!(data.skills[0].name(), "x");
        assert_eq!(data.skills[1].level(), Some("expert"));
        assert_eq!(data.personal_statement.as_deref(), Some("Hello"));
        assert!(data.experience.is_empty());
        assert!(data.declaration.is_none());
    }

    #[test]
    fn test_deserialize_empty_object() {
        let data: ResumeData = serde_json::from_value(json!({})).unwrap();
        assert_eq!(data, ResumeData::default());
    }

    #[test]
    fn test_null_sections_read_as_absent() {
        let data: ResumeData = serde_json::from_value(json!({
            "basics": { "name": "A", "email": "a@x.com" },
            "skills": null,
            "experience": [{ "company": "X", "current": null, "highlights": null }],
            "education": null,
            "projects": [{ "name": "P", "highlights": null, "keywords": null }],
            "personalStatement": null,
            "declaration": null
        }))
        .unwrap();

        assert!(data.skills.is_empty());
        assert!(data.education.is_empty());
        assert!(!data.experience[0].current);
        assert!(data.experience[0].highlights.is_empty());
        assert!(data.projects[0].highlights.is_empty());
        assert!(data.projects[0].keywords.is_empty());
        assert!(data.personal_statement.is_none());
    }

    #[test]
    fn test_null_skill_keywords_read_as_empty() {
        let data: ResumeData = serde_json::from_value(json!({
            "skills": [{ "name": "Rust", "keywords": null }]
        }))
        .unwrap();
        assert_eq!(data.skills[0].name(), "Rust");
        assert!(data.skills[0].keywords().is_empty());
    }

    #[test]
    fn test_redacted_summary_hides_values() {
        let data: ResumeData = serde_json::from_value(json!({
            "basics": { "name": "Jane Secret", "email": "jane@secret.example" },
            "skills": ["x"],
            "declaration": { "text": "I hereby declare" }
        }))
        .unwrap();

        let summary = data.redacted_summary();
        assert!(summary.contains("basics{name,email}"));
        assert!(summary.contains("skills x1"));
        assert!(summary.contains("declaration: present"));
        assert!(!summary.contains("Jane"));
        assert!(!summary.contains("secret.example"));
        assert!(!summary.contains("hereby"));
    }

    #[test]
    fn test_resume_id_accepts_plain_ids() {
        assert_eq!(ResumeId::parse("42").unwrap().to_string(), "42");
        assert!(ResumeId::parse("a1b2-C3_d4").is_ok());
    }

    #[test]
    fn test_resume_id_rejects_path_characters() {
        assert_eq!(ResumeId::parse(""), Err(InvalidResumeId));
        assert_eq!(ResumeId::parse("../etc"), Err(InvalidResumeId));
        assert_eq!(ResumeId::parse("a/b"), Err(InvalidResumeId));
        assert_eq!(ResumeId::parse("a.png"), Err(InvalidResumeId));
        assert_eq!(ResumeId::parse(&"x".repeat(129)), Err(InvalidResumeId));
    }
}
