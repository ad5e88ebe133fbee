//! Executive: dark banner header, summary first, dense experience block.

use crate::models::ResumeData;

use super::markup::{el, Node};
use super::sections::*;

pub const STYLESHEET: &str = r#"
body { margin: 0; background: #fff; color: #111827; font-family: "Segoe UI", Roboto, Arial, sans-serif; font-size: 10.5pt; line-height: 1.4; }
.resume header { background: #111827; color: #f9fafb; padding: 36px 56px 28px; }
.name { font-size: 24pt; margin: 0; text-transform: uppercase; letter-spacing: 2px; }
.label { margin: 4px 0 0; color: #d4af37; font-weight: 600; text-transform: uppercase; letter-spacing: 1px; }
.contact { list-style: none; padding: 0; margin: 12px 0 0; display: flex; flex-wrap: wrap; gap: 6px 20px; font-size: 9.5pt; color: #d1d5db; }
.body { padding: 24px 56px 40px; }
h2 { font-size: 11pt; text-transform: uppercase; letter-spacing: 2px; margin: 0 0 8px; padding-left: 8px; border-left: 4px solid #d4af37; }
h3 { font-size: 11pt; margin: 0; }
section { margin-bottom: 16px; }
.statement { font-size: 11pt; }
.entry { margin-bottom: 10px; }
.entry-header { display: flex; justify-content: space-between; align-items: baseline; }
.dates { font-weight: 600; color: #4b5563; }
.where, .degree, .score, .url, .keywords { margin: 0; color: #4b5563; }
.highlights { margin: 4px 0 0 18px; padding: 0; }
.skills { list-style: none; padding: 0; margin: 0; columns: 3; }
.skill { break-inside: avoid; margin-bottom: 4px; }
.skill-level, .skill-keywords { margin-left: 4px; color: #6b7280; font-size: 9pt; }
.signoff { text-align: right; font-weight: 600; }
"#;

pub fn render(data: &ResumeData) -> Node {
    let basics = data.basics.as_ref();
    let header = el("header")
        .child(name_heading(basics))
        .maybe(label_line(basics))
        .maybe(contact_list(basics));

    let body = el("div")
        .class("body")
        .maybe(section(
            "summary",
            "Executive Summary",
            paragraph("statement", summary_text(data)),
        ))
        .maybe(section(
            "experience",
            "Professional Experience",
            experience_body(&data.experience),
        ))
        .maybe(section("skills", "Core Competencies", skills_body(&data.skills)))
        .maybe(section("projects", "Key Initiatives", projects_body(&data.projects)))
        .maybe(section("education", "Education", education_body(&data.education)))
        .maybe(section(
            "declaration",
            "Declaration",
            declaration_body(data.declaration.as_ref()),
        ));

    el("main")
        .class("resume resume-executive")
        .child(header)
        .child(body)
        .into()
}
