//! Modern: two columns, a tinted sidebar with contact details and skills.

use crate::models::ResumeData;

use super::markup::{el, Node};
use super::sections::*;

pub const STYLESHEET: &str = r#"
body { margin: 0; background: #fff; color: #1f2933; font-family: "Helvetica Neue", Arial, sans-serif; font-size: 10.5pt; line-height: 1.45; }
.resume { display: flex; min-height: 1123px; }
.sidebar { width: 240px; flex: none; background: #1f4e79; color: #f5f7fa; padding: 40px 24px; box-sizing: border-box; }
.content { flex: 1; padding: 40px 36px; }
.name { font-size: 22pt; margin: 0 0 4px; line-height: 1.1; }
.label { margin: 0 0 16px; color: #c8d6e5; }
.contact { list-style: none; padding: 0; margin: 0 0 20px; word-break: break-all; }
.contact li { margin-bottom: 4px; }
.sidebar h2 { color: #fff; border-bottom: 1px solid #5b84b1; }
h2 { font-size: 11pt; text-transform: uppercase; letter-spacing: 2px; color: #1f4e79; margin: 0 0 8px; padding-bottom: 4px; border-bottom: 2px solid #1f4e79; }
h3 { font-size: 11pt; margin: 0; }
section { margin-bottom: 18px; }
.entry { margin-bottom: 10px; }
.entry-header { display: flex; justify-content: space-between; align-items: baseline; }
.dates { font-size: 9pt; color: #52606d; }
.where, .degree, .score, .url, .keywords { margin: 0; color: #52606d; }
.highlights { margin: 4px 0 0 16px; padding: 0; }
.skills { list-style: none; padding: 0; margin: 0; }
.skill { margin-bottom: 6px; }
.skill-name { display: block; font-weight: bold; }
.skill-level, .skill-keywords { display: block; font-size: 9pt; color: #c8d6e5; }
.signoff { text-align: right; color: #52606d; }
"#;

pub fn render(data: &ResumeData) -> Node {
    let basics = data.basics.as_ref();
    let sidebar = el("aside")
        .class("sidebar")
        .child(name_heading(basics))
        .maybe(label_line(basics))
        .maybe(contact_list(basics))
        .maybe(section("skills", "Skills", skills_body(&data.skills)));

    let content = el("div")
        .class("content")
        .maybe(section("summary", "Profile", paragraph("statement", summary_text(data))))
        .maybe(section("experience", "Experience", experience_body(&data.experience)))
        .maybe(section("projects", "Projects", projects_body(&data.projects)))
        .maybe(section("education", "Education", education_body(&data.education)))
        .maybe(section(
            "declaration",
            "Declaration",
            declaration_body(data.declaration.as_ref()),
        ));

    el("main")
        .class("resume resume-modern")
        .child(sidebar)
        .child(content)
        .into()
}
