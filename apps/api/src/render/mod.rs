//! Document renderer. Resume data + template → a self-contained HTML document.
//!
//! The output depends only on its inputs: identical (variant, data) pairs give
//! byte-identical documents, which keeps snapshots reproducible. The envelope
//! carries no external references, so the capture engine never has to wait on
//! the network.

pub mod handlers;

use thiserror::Error;
use tracing::warn;

use crate::models::ResumeData;
use crate::templates::markup::{escape_into, MarkupError};
use crate::templates::{self, TemplateVariant, UnknownTemplateError};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    UnknownTemplate(#[from] UnknownTemplateError),

    /// The template produced a tree that cannot be serialized. `data` is a
    /// redacted summary, never resume field values.
    #[error("template '{variant}' produced invalid markup ({source}); data: {data}")]
    Malformed {
        variant: TemplateVariant,
        data: String,
        #[source]
        source: MarkupError,
    },
}

/// A finished HTML document for one (variant, data) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    variant: TemplateVariant,
    html: String,
}

impl RenderedDocument {
    pub fn variant(&self) -> TemplateVariant {
        self.variant
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }
}

pub fn render(variant: TemplateVariant, data: &ResumeData) -> Result<RenderedDocument, RenderError> {
    let template = variant.template();
    let tree = (template.render)(data);

    let body = tree.to_html().map_err(|source| {
        let err = RenderError::Malformed {
            variant,
            data: data.redacted_summary(),
            source,
        };
        warn!("render failed: {err}");
        err
    })?;

    let title = data
        .basics
        .as_ref()
        .and_then(|b| b.name.as_deref())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or("Resume");

    Ok(RenderedDocument {
        variant,
        html: wrap_document(title, template.stylesheet, &body),
    })
}

/// Same as [`render`] but resolves the template from the editor's string id.
pub fn render_named(name: &str, data: &ResumeData) -> Result<RenderedDocument, RenderError> {
    let template = templates::resolve(name)?;
    render(template.variant, data)
}

fn wrap_document(title: &str, stylesheet: &str, body: &str) -> String {
    let mut html = String::with_capacity(body.len() + stylesheet.len() + 256);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>");
    escape_into(title, &mut html);
    html.push_str("</title>\n<style>");
    html.push_str(stylesheet);
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str(body);
    html.push_str("\n</body>\n</html>\n");
    html
}
