//! Building blocks shared by the templates. Each template arranges these in its
//! own order and styles them through its own stylesheet.

use crate::models::resume::{
    Basics, Declaration, EducationEntry, ExperienceEntry, ProjectEntry, Skill,
};
use crate::models::ResumeData;

use super::markup::{el, Element, Node};

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// `<section>` with a heading, or `None` when there is nothing to show.
pub fn section(class: &str, title: &str, body: Vec<Node>) -> Option<Element> {
    if body.is_empty() {
        return None;
    }
    Some(
        el("section")
            .class(class)
            .child(el("h2").text(title))
            .children(body),
    )
}

pub fn name_heading(basics: Option<&Basics>) -> Element {
    let name = basics.and_then(|b| non_empty(&b.name)).unwrap_or("Your Name");
    el("h1").class("name").text(name)
}

pub fn label_line(basics: Option<&Basics>) -> Option<Element> {
    basics
        .and_then(|b| non_empty(&b.label))
        .map(|label| el("p").class("label").text(label))
}

pub fn contact_items(basics: Option<&Basics>) -> Vec<String> {
    let Some(basics) = basics else {
        return Vec::new();
    };
    [&basics.email, &basics.phone, &basics.location, &basics.website]
        .into_iter()
        .filter_map(non_empty)
        .map(str::to_string)
        .collect()
}

/// Contact details as a flat list, one `<li>` per item.
pub fn contact_list(basics: Option<&Basics>) -> Option<Element> {
    let items = contact_items(basics);
    if items.is_empty() {
        return None;
    }
    Some(
        el("ul")
            .class("contact")
            .children(items.into_iter().map(|item| el("li").text(item))),
    )
}

pub fn summary_text(data: &ResumeData) -> Option<&str> {
    non_empty(&data.personal_statement)
        .or_else(|| data.basics.as_ref().and_then(|b| non_empty(&b.summary)))
}

pub fn paragraph(class: &str, value: Option<&str>) -> Vec<Node> {
    value
        .map(|v| vec![Node::from(el("p").class(class).text(v))])
        .unwrap_or_default()
}

pub fn date_range(start: &Option<String>, end: &Option<String>, current: bool) -> Option<String> {
    let end = if current {
        Some("Present")
    } else {
        non_empty(end)
    };
    match (non_empty(start), end) {
        (Some(start), Some(end)) => Some(format!("{start} – {end}")),
        (Some(start), None) => Some(start.to_string()),
        (None, Some(end)) => Some(end.to_string()),
        (None, None) => None,
    }
}

fn bullet_list(items: &[String]) -> Option<Element> {
    let items: Vec<&String> = items.iter().filter(|i| !i.trim().is_empty()).collect();
    if items.is_empty() {
        return None;
    }
    Some(
        el("ul")
            .class("highlights")
            .children(items.into_iter().map(|item| el("li").text(item.as_str()))),
    )
}

fn entry_header(title: Option<String>, meta: Option<String>) -> Element {
    el("div")
        .class("entry-header")
        .maybe(title.map(|t| el("h3").text(t)))
        .maybe(meta.map(|m| el("span").class("dates").text(m)))
}

fn join_present(parts: &[Option<&str>], separator: &str) -> Option<String> {
    let present: Vec<&str> = parts.iter().flatten().copied().collect();
    if present.is_empty() {
        None
    } else {
        Some(present.join(separator))
    }
}

pub fn experience_item(entry: &ExperienceEntry) -> Element {
    let title = join_present(&[non_empty(&entry.position), non_empty(&entry.company)], " · ");
    el("article")
        .class("entry")
        .child(entry_header(
            title,
            date_range(&entry.start_date, &entry.end_date, entry.current),
        ))
        .maybe(non_empty(&entry.location).map(|l| el("p").class("where").text(l)))
        .maybe(non_empty(&entry.summary).map(|s| el("p").class("entry-summary").text(s)))
        .maybe(bullet_list(&entry.highlights))
}

pub fn education_item(entry: &EducationEntry) -> Element {
    let degree = join_present(&[non_empty(&entry.study_type), non_empty(&entry.area)], ", ");
    el("article")
        .class("entry")
        .child(entry_header(
            non_empty(&entry.institution).map(str::to_string),
            date_range(&entry.start_date, &entry.end_date, false),
        ))
        .maybe(degree.map(|d| el("p").class("degree").text(d)))
        .maybe(non_empty(&entry.score).map(|s| el("p").class("score").text(s)))
}

pub fn project_item(entry: &ProjectEntry) -> Element {
    // Links stay as text so the capture never follows them.
    el("article")
        .class("entry")
        .child(entry_header(non_empty(&entry.name).map(str::to_string), None))
        .maybe(non_empty(&entry.url).map(|u| el("p").class("url").text(u)))
        .maybe(non_empty(&entry.description).map(|d| el("p").class("entry-summary").text(d)))
        .maybe(bullet_list(&entry.highlights))
        .maybe(
            join_present(
                &entry.keywords.iter().map(|k| Some(k.as_str())).collect::<Vec<_>>(),
                ", ",
            )
            .map(|k| el("p").class("keywords").text(k)),
        )
}

pub fn skill_item(skill: &Skill) -> Element {
    let mut item = el("li").class("skill").child(el("span").class("skill-name").text(skill.name()));
    if let Some(level) = skill.level().filter(|l| !l.trim().is_empty()) {
        item = item.child(el("span").class("skill-level").text(level));
    }
    if !skill.keywords().is_empty() {
        item = item.child(el("span").class("skill-keywords").text(skill.keywords().join(", ")));
    }
    item
}

pub fn skills_body(skills: &[Skill]) -> Vec<Node> {
    if skills.is_empty() {
        return Vec::new();
    }
    vec![el("ul")
        .class("skills")
        .children(skills.iter().map(skill_item))
        .into()]
}

pub fn experience_body(entries: &[ExperienceEntry]) -> Vec<Node> {
    entries.iter().map(|e| experience_item(e).into()).collect()
}

pub fn education_body(entries: &[EducationEntry]) -> Vec<Node> {
    entries.iter().map(|e| education_item(e).into()).collect()
}

pub fn projects_body(entries: &[ProjectEntry]) -> Vec<Node> {
    entries.iter().map(|e| project_item(e).into()).collect()
}

pub fn declaration_body(declaration: Option<&Declaration>) -> Vec<Node> {
    let Some(declaration) = declaration else {
        return Vec::new();
    };
    let Some(text) = non_empty(&declaration.text) else {
        return Vec::new();
    };
    let signoff = join_present(
        &[non_empty(&declaration.place), non_empty(&declaration.date)],
        ", ",
    );
    let mut body: Vec<Node> = vec![el("p").class("declaration-text").text(text).into()];
    if let Some(signoff) = signoff {
        body.push(el("p").class("signoff").text(signoff).into());
    }
    body
}
