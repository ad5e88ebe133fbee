//! Section completion. Decides which editor steps are done, how far along the
//! resume is, and whether the editor may move past the current step.
//!
//! Everything here is a pure function of `ResumeData` and the step list; state
//! is recomputed on every call.

pub mod handlers;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{ResumeData, StepDefinition};

/// The section a step edits. Ids the evaluator does not know are preserved as
/// `Other` so newer editors keep working; such sections never count as complete.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SectionKind {
    Basics,
    Skills,
    Experience,
    Projects,
    PersonalStatement,
    Education,
    Declaration,
    Other(String),
}

impl SectionKind {
    pub fn as_str(&self) -> &str {
        match self {
            SectionKind::Basics => "basics",
            SectionKind::Skills => "skills",
            SectionKind::Experience => "experience",
            SectionKind::Projects => "projects",
            SectionKind::PersonalStatement => "personalStatement",
            SectionKind::Education => "education",
            SectionKind::Declaration => "declaration",
            SectionKind::Other(id) => id,
        }
    }
}

impl From<&str> for SectionKind {
    fn from(id: &str) -> Self {
        match id {
            "basics" => SectionKind::Basics,
            "skills" => SectionKind::Skills,
            "experience" => SectionKind::Experience,
            "projects" => SectionKind::Projects,
            "personalStatement" | "personal" => SectionKind::PersonalStatement,
            "education" => SectionKind::Education,
            "declaration" => SectionKind::Declaration,
            other => SectionKind::Other(other.to_string()),
        }
    }
}

impl From<String> for SectionKind {
    fn from(id: String) -> Self {
        SectionKind::from(id.as_str())
    }
}

impl From<SectionKind> for String {
    fn from(kind: SectionKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived progress for a resume against a step list. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionState {
    pub percentage: u8,
    pub per_step_complete: BTreeMap<String, bool>,
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// Completion rule for a single section.
///
/// | kind | complete when |
/// |---|---|
/// | basics | name and email both non-empty |
/// | skills / experience / projects / education | at least one entry |
/// | personalStatement | statement text non-empty |
/// | declaration | declaration text non-empty |
/// | anything else | never |
pub fn is_complete(kind: &SectionKind, data: &ResumeData) -> bool {
    match kind {
        SectionKind::Basics => data.basics.as_ref().is_some_and(|basics| {
            has_text(basics.name.as_deref()) && has_text(basics.email.as_deref())
        }),
        SectionKind::Skills => !data.skills.is_empty(),
        SectionKind::Experience => !data.experience.is_empty(),
        SectionKind::Projects => !data.projects.is_empty(),
        SectionKind::PersonalStatement => has_text(data.personal_statement.as_deref()),
        SectionKind::Education => !data.education.is_empty(),
        SectionKind::Declaration => {
            has_text(data.declaration.as_ref().and_then(|d| d.text.as_deref()))
        }
        SectionKind::Other(_) => false,
    }
}

/// Share of complete steps, 0–100, rounded half-up. An empty step list is 0%.
pub fn completion_percentage(data: &ResumeData, steps: &[StepDefinition]) -> u8 {
    if steps.is_empty() {
        return 0;
    }
    let total = steps.len();
    let complete = steps.iter().filter(|s| is_complete(&s.kind(), data)).count();
    // round(100 * complete / total) in integers: floor((200 * complete + total) / (2 * total))
    ((200 * complete + total) / (2 * total)) as u8
}

/// Whether the editor may leave `steps[current_index]` going forward.
pub fn can_advance(steps: &[StepDefinition], current_index: usize, data: &ResumeData) -> bool {
    steps
        .get(current_index)
        .is_some_and(|step| is_complete(&step.kind(), data))
}

/// Per-step results are keyed by each step's id exactly as the editor sent it,
/// so an aliased id such as `personal` comes back under `personal`.
pub fn evaluate(data: &ResumeData, steps: &[StepDefinition]) -> CompletionState {
    let per_step_complete = steps
        .iter()
        .map(|s| (s.id.clone(), is_complete(&s.kind(), data)))
        .collect();
    CompletionState {
        percentage: completion_percentage(data, steps),
        per_step_complete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Basics, Declaration, EducationEntry, ExperienceEntry, ProjectEntry, Skill};

    fn steps(ids: &[&str]) -> Vec<StepDefinition> {
        ids.iter()
            .map(|id| StepDefinition::new(*id))
            .collect()
    }

    fn basics(name: Option<&str>, email: Option<&str>) -> ResumeData {
        ResumeData {
            basics: Some(Basics {
                name: name.map(str::to_string),
                email: email.map(str::to_string),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_basics_requires_name_and_email() {
        assert!(is_complete(&SectionKind::Basics, &basics(Some("A"), Some("a@x.com"))));
        assert!(!is_complete(&SectionKind::Basics, &basics(Some("A"), None)));
        assert!(!is_complete(&SectionKind::Basics, &basics(None, Some("a@x.com"))));
        assert!(!is_complete(&SectionKind::Basics, &basics(Some(""), Some("a@x.com"))));
        assert!(!is_complete(&SectionKind::Basics, &basics(Some("A"), Some(""))));
        assert!(!is_complete(&SectionKind::Basics, &ResumeData::default()));
    }

    #[test]
    fn test_list_sections_need_one_entry() {
        let mut data = ResumeData::default();
        for kind in [
            SectionKind::Skills,
            SectionKind::Experience,
            SectionKind::Projects,
            SectionKind::Education,
        ] {
            assert!(!is_complete(&kind, &data), "{kind} should start incomplete");
        }

        data.skills.push(Skill::Name("x".into()));
        data.experience.push(ExperienceEntry::default());
        data.projects.push(ProjectEntry::default());
        data.education.push(EducationEntry::default());

        for kind in [
            SectionKind::Skills,
            SectionKind::Experience,
            SectionKind::Projects,
            SectionKind::Education,
        ] {
            assert!(is_complete(&kind, &data), "{kind} should be complete");
        }
    }

    #[test]
    fn test_personal_statement_and_alias() {
        let mut data = ResumeData::default();
        assert!(!is_complete(&SectionKind::from("personal"), &data));
        data.personal_statement = Some(String::new());
        assert!(!is_complete(&SectionKind::PersonalStatement, &data));
        data.personal_statement = Some("Driven engineer".into());
        assert!(is_complete(&SectionKind::from("personal"), &data));
        assert!(is_complete(&SectionKind::from("personalStatement"), &data));
    }

    #[test]
    fn test_declaration_requires_text() {
        let mut data = ResumeData {
            declaration: Some(Declaration::default()),
            ..Default::default()
        };
        assert!(!is_complete(&SectionKind::Declaration, &data));
        data.declaration = Some(Declaration {
            text: Some("I declare".into()),
            ..Default::default()
        });
        assert!(is_complete(&SectionKind::Declaration, &data));
    }

    #[test]
    fn test_unknown_section_is_incomplete() {
        let mut data = basics(Some("A"), Some("a@x.com"));
        data.skills.push(Skill::Name("x".into()));
        let kind = SectionKind::from("certifications");
        assert_eq!(kind, SectionKind::Other("certifications".into()));
        assert!(!is_complete(&kind, &data));
    }

    #[test]
    fn test_percentage_empty_steps_is_zero() {
        assert_eq!(completion_percentage(&ResumeData::default(), &[]), 0);
        assert_eq!(completion_percentage(&basics(Some("A"), Some("a@x.com")), &[]), 0);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        let data = basics(Some("A"), Some("a@x.com"));
        // 1 of 8 = 12.5% -> 13
        let eight = steps(&[
            "basics", "skills", "experience", "projects", "education", "personal", "declaration", "extra",
        ]);
        assert_eq!(completion_percentage(&data, &eight), 13);
        // 1 of 3 = 33.33% -> 33
        assert_eq!(completion_percentage(&data, &steps(&["basics", "skills", "education"])), 33);
        assert_eq!(completion_percentage(&data, &steps(&["basics"])), 100);
    }

    #[test]
    fn test_percentage_is_monotonic() {
        let all = steps(&[
            "basics", "skills", "experience", "projects", "education", "personalStatement", "declaration",
        ]);
        let mut data = ResumeData::default();
        let mut last = completion_percentage(&data, &all);
        assert_eq!(last, 0);

        let fills: Vec<Box<dyn Fn(&mut ResumeData)>> = vec![
            Box::new(|d| d.basics = basics(Some("A"), Some("a@x.com")).basics),
            Box::new(|d| d.skills.push(Skill::Name("x".into()))),
            Box::new(|d| d.experience.push(ExperienceEntry::default())),
            Box::new(|d| d.projects.push(ProjectEntry::default())),
            Box::new(|d| d.education.push(EducationEntry::default())),
            Box::new(|d| d.personal_statement = Some("p".into())),
            Box::new(|d| {
                d.declaration = Some(Declaration {
                    text: Some("d".into()),
                    ..Default::default()
                })
            }),
        ];
        for fill in fills {
            fill(&mut data);
            let next = completion_percentage(&data, &all);
            assert!(next >= last, "{next} < {last}");
            last = next;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn test_editor_scenario() {
        let mut data = basics(Some("A"), Some("a@x.com"));
        data.skills.push(Skill::Name("x".into()));
        let steps = steps(&["basics", "skills", "experience"]);

        assert_eq!(completion_percentage(&data, &steps), 67);
        assert!(can_advance(&steps, 0, &data));
        assert!(can_advance(&steps, 1, &data));
        assert!(!can_advance(&steps, 2, &data));
    }

    #[test]
    fn test_can_advance_out_of_bounds() {
        let data = basics(Some("A"), Some("a@x.com"));
        assert!(!can_advance(&steps(&["basics"]), 1, &data));
        assert!(!can_advance(&[], 0, &data));
    }

    #[test]
    fn test_evaluate_reports_each_step() {
        let data = basics(Some("A"), Some("a@x.com"));
        let state = evaluate(&data, &steps(&["basics", "personal", "hobbies"]));
        assert_eq!(state.percentage, 33);
        assert_eq!(state.per_step_complete.get("basics"), Some(&true));
        assert_eq!(state.per_step_complete.get("personal"), Some(&false));
        assert_eq!(state.per_step_complete.get("hobbies"), Some(&false));
        assert!(!state.per_step_complete.contains_key("personalStatement"));
    }

    #[test]
    fn test_step_ids_deserialize_as_sent() {
        let parsed: Vec<StepDefinition> =
            serde_json::from_str(r#"[{"id":"personal","title":"About you"},{"id":"skills"}]"#)
                .unwrap();
        assert_eq!(parsed[0].id, "personal");
        assert_eq!(parsed[0].kind(), SectionKind::PersonalStatement);
        assert_eq!(parsed[1].kind(), SectionKind::Skills);
    }

    #[test]
    fn test_null_sections_are_incomplete() {
        let data: ResumeData = serde_json::from_str(
            r#"{"basics":{"name":"A","email":"a@x.com"},"skills":null,"experience":null}"#,
        )
        .unwrap();
        let state = evaluate(&data, &steps(&["basics", "skills", "experience"]));
        assert_eq!(state.per_step_complete.get("basics"), Some(&true));
        assert_eq!(state.per_step_complete.get("skills"), Some(&false));
        assert_eq!(state.per_step_complete.get("experience"), Some(&false));
        assert_eq!(state.percentage, 33);
    }

    #[test]
    fn test_section_kind_serde_round_trip_names() {
        let kinds: Vec<SectionKind> =
            serde_json::from_str(r#"["basics","personal","custom"]"#).unwrap();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Basics,
                SectionKind::PersonalStatement,
                SectionKind::Other("custom".into())
            ]
        );
        assert_eq!(
            serde_json::to_string(&kinds).unwrap(),
            r#"["basics","personalStatement","custom"]"#
        );
    }
}
