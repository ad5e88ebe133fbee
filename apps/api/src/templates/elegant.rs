//! Elegant: centered, airy serif layout with small-caps headings.

use crate::models::ResumeData;

use super::markup::{el, Node};
use super::sections::*;

pub const STYLESHEET: &str = r#"
body { margin: 0; background: #fffdf8; color: #3b3a36; font-family: "Palatino Linotype", Palatino, "Book Antiqua", serif; font-size: 11pt; line-height: 1.55; }
.resume { padding: 56px 72px; }
.resume header { text-align: center; padding-bottom: 16px; margin-bottom: 20px; border-bottom: 1px solid #c9b79c; }
.name { font-size: 28pt; font-weight: normal; letter-spacing: 3px; margin: 0; }
.label { margin: 6px 0 0; font-variant: small-caps; letter-spacing: 2px; color: #8a7356; }
.contact { list-style: none; padding: 0; margin: 10px 0 0; font-size: 9.5pt; }
.contact li { display: inline-block; margin: 0 8px; }
h2 { font-size: 12pt; font-weight: normal; font-variant: small-caps; letter-spacing: 3px; text-align: center; color: #8a7356; margin: 0 0 10px; }
h3 { font-size: 11pt; margin: 0; font-weight: 600; }
section { margin-bottom: 20px; }
.statement { text-align: center; font-style: italic; }
.entry { margin-bottom: 12px; }
.entry-header { display: flex; justify-content: space-between; align-items: baseline; }
.dates { font-style: italic; color: #8a7356; }
.where, .degree, .score, .url, .keywords { margin: 0; color: #6b6659; }
.highlights { margin: 4px 0 0 20px; padding: 0; }
.skills { list-style: none; padding: 0; margin: 0; text-align: center; }
.skill { display: inline-block; margin: 0 10px 6px; }
.skill-level, .skill-keywords { margin-left: 4px; font-style: italic; color: #8a7356; }
.declaration-text { font-style: italic; }
.signoff { text-align: right; }
"#;

pub fn render(data: &ResumeData) -> Node {
    let basics = data.basics.as_ref();
    el("main")
        .class("resume resume-elegant")
        .child(
            el("header")
                .child(name_heading(basics))
                .maybe(label_line(basics))
                .maybe(contact_list(basics)),
        )
        .maybe(section("summary", "About", paragraph("statement", summary_text(data))))
        .maybe(section("skills", "Expertise", skills_body(&data.skills)))
        .maybe(section("experience", "Experience", experience_body(&data.experience)))
        .maybe(section("projects", "Selected Work", projects_body(&data.projects)))
        .maybe(section("education", "Education", education_body(&data.education)))
        .maybe(section(
            "declaration",
            "Declaration",
            declaration_body(data.declaration.as_ref()),
        ))
        .into()
}
