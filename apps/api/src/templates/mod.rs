//! Template registry. The closed set of visual styles a resume can be rendered in.
//!
//! Every `TemplateVariant` maps to exactly one `Template`. The table is a
//! `static`, built at compile time and never mutated.

pub mod classic;
pub mod elegant;
pub mod executive;
pub mod markup;
pub mod modern;
pub mod sections;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ResumeData;
use markup::Node;

/// Pure function from resume data to a markup tree. No I/O, clock or randomness.
pub type RendererFn = fn(&ResumeData) -> Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateVariant {
    Classic,
    Modern,
    Elegant,
    Executive,
}

impl TemplateVariant {
    pub const ALL: [TemplateVariant; 4] = [
        TemplateVariant::Classic,
        TemplateVariant::Modern,
        TemplateVariant::Elegant,
        TemplateVariant::Executive,
    ];

    pub fn id(self) -> &'static str {
        match self {
            TemplateVariant::Classic => "classic",
            TemplateVariant::Modern => "modern",
            TemplateVariant::Elegant => "elegant",
            TemplateVariant::Executive => "executive",
        }
    }

    /// The registered template for this variant.
    pub fn template(self) -> &'static Template {
        // Indices follow declaration order; `test_registry_is_complete` pins it.
        &REGISTRY[self as usize]
    }
}

impl fmt::Display for TemplateVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown template '{name}'")]
pub struct UnknownTemplateError {
    pub name: String,
}

impl FromStr for TemplateVariant {
    type Err = UnknownTemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateVariant::ALL
            .into_iter()
            .find(|v| v.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownTemplateError {
                name: s.to_string(),
            })
    }
}

pub struct Template {
    pub variant: TemplateVariant,
    pub display_name: &'static str,
    /// Inlined into the document `<style>`; must not reference external resources.
    pub stylesheet: &'static str,
    pub render: RendererFn,
}

static REGISTRY: [Template; 4] = [
    Template {
        variant: TemplateVariant::Classic,
        display_name: "Classic",
        stylesheet: classic::STYLESHEET,
        render: classic::render,
    },
    Template {
        variant: TemplateVariant::Modern,
        display_name: "Modern",
        stylesheet: modern::STYLESHEET,
        render: modern::render,
    },
    Template {
        variant: TemplateVariant::Elegant,
        display_name: "Elegant",
        stylesheet: elegant::STYLESHEET,
        render: elegant::render,
    },
    Template {
        variant: TemplateVariant::Executive,
        display_name: "Executive",
        stylesheet: executive::STYLESHEET,
        render: executive::render,
    },
];

/// Resolves a template by its string id, as received from the editor.
pub fn resolve(name: &str) -> Result<&'static Template, UnknownTemplateError> {
    name.parse::<TemplateVariant>().map(TemplateVariant::template)
}

pub fn all() -> impl Iterator<Item = &'static Template> {
    REGISTRY.iter()
}
