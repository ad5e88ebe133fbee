//! Classic: single column, serif body, ruled section headings.

use crate::models::ResumeData;

use super::markup::{el, Node};
use super::sections::*;

pub const STYLESHEET: &str = r#"
body { margin: 0; background: #fff; color: #222; font-family: Georgia, "Times New Roman", serif; font-size: 11pt; line-height: 1.4; }
.resume { padding: 48px 56px; }
.resume header { text-align: center; margin-bottom: 18px; }
.name { font-size: 26pt; margin: 0; letter-spacing: 1px; }
.label { margin: 4px 0; font-style: italic; }
.contact { list-style: none; padding: 0; margin: 6px 0 0; }
.contact li { display: inline; }
.contact li + li::before { content: " | "; }
section { margin-top: 14px; }
h2 { font-size: 12pt; text-transform: uppercase; border-bottom: 1px solid #222; padding-bottom: 2px; margin: 0 0 6px; }
h3 { font-size: 11pt; margin: 0; }
.entry { margin-bottom: 8px; }
.entry-header { display: flex; justify-content: space-between; }
.dates, .where { color: #555; }
.where, .degree, .score, .url, .keywords { margin: 0; }
.highlights { margin: 4px 0 0 18px; padding: 0; }
.skills { list-style: none; padding: 0; margin: 0; }
.skills .skill { display: inline; }
.skills .skill + .skill::before { content: ", "; }
.skill-level, .skill-keywords { margin-left: 4px; color: #555; }
.skill-level::before, .skill-keywords::before { content: "("; }
.skill-level::after, .skill-keywords::after { content: ")"; }
.signoff { text-align: right; }
"#;

pub fn render(data: &ResumeData) -> Node {
    let basics = data.basics.as_ref();
    el("main")
        .class("resume resume-classic")
        .child(
            el("header")
                .child(name_heading(basics))
                .maybe(label_line(basics))
                .maybe(contact_list(basics)),
        )
        .maybe(section("summary", "Summary", paragraph("statement", summary_text(data))))
        .maybe(section("experience", "Experience", experience_body(&data.experience)))
        .maybe(section("education", "Education", education_body(&data.education)))
        .maybe(section("skills", "Skills", skills_body(&data.skills)))
        .maybe(section("projects", "Projects", projects_body(&data.projects)))
        .maybe(section(
            "declaration",
            "Declaration",
            declaration_body(data.declaration.as_ref()),
        ))
        .into()
}
