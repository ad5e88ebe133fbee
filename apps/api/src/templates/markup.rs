//! A tiny typed markup tree. Templates build `Node`s; the renderer serializes
//! them. Text and attribute values are always escaped on output.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MarkupError {
    #[error("invalid tag name {0:?}")]
    InvalidTag(String),

    #[error("invalid attribute name {name:?} on <{tag}>")]
    InvalidAttribute { tag: String, name: String },

    #[error("void element <{0}> cannot have children")]
    VoidWithChildren(String),
}

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "meta", "link"];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// Starts an element builder.
pub fn el(tag: &str) -> Element {
    Element {
        tag: tag.to_string(),
        attrs: Vec::new(),
        children: Vec::new(),
    }
}

pub fn text(value: impl Into<String>) -> Node {
    Node::Text(value.into())
}

impl Element {
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    pub fn class(self, value: &str) -> Self {
        self.attr("class", value)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Appends a child only when one is given.
    pub fn maybe(mut self, node: Option<impl Into<Node>>) -> Self {
        if let Some(node) = node {
            self.children.push(node.into());
        }
        self
    }

    pub fn text(self, value: impl Into<String>) -> Self {
        self.child(text(value))
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    pub fn to_html(&self) -> Result<String, MarkupError> {
        let mut out = String::new();
        self.write_html(&mut out)?;
        Ok(out)
    }

    pub fn write_html(&self, out: &mut String) -> Result<(), MarkupError> {
        match self {
            Node::Text(value) => {
                escape_into(value, out);
                Ok(())
            }
            Node::Element(element) => element.write_html(out),
        }
    }
}

impl Element {
    fn write_html(&self, out: &mut String) -> Result<(), MarkupError> {
        if !is_valid_name(&self.tag) {
            return Err(MarkupError::InvalidTag(self.tag.clone()));
        }
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            if !is_valid_name(name) {
                return Err(MarkupError::InvalidAttribute {
                    tag: self.tag.clone(),
                    name: name.clone(),
                });
            }
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_into(value, out);
            out.push('"');
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            if !self.children.is_empty() {
                return Err(MarkupError::VoidWithChildren(self.tag.clone()));
            }
            return Ok(());
        }

        for child in &self.children {
            child.write_html(out)?;
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
        Ok(())
    }
}

/// Lowercase ASCII letters, digits and hyphens, starting with a letter.
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

pub fn escape_into(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_text_and_attributes() {
        let node: Node = el("p")
            .attr("title", "a\"b")
            .text("<script>&'")
            .into();
        assert_eq!(
            node.to_html().unwrap(),
            "<p title=\"a&quot;b\">&lt;script&gt;&amp;&#39;</p>"
        );
    }

    #[test]
    fn test_void_elements_have_no_closing_tag() {
        let node: Node = el("div").child(el("hr")).child(el("br")).into();
        assert_eq!(node.to_html().unwrap(), "<div><hr><br></div>");
    }

    #[test]
    fn test_rejects_invalid_tag() {
        let node: Node = el("div").child(el("bad tag")).into();
        assert_eq!(
            node.to_html(),
            Err(MarkupError::InvalidTag("bad tag".to_string()))
        );
    }

    #[test]
    fn test_rejects_invalid_attribute() {
        let node: Node = el("div").attr("onclick=\"x", "y").into();
        assert!(matches!(
            node.to_html(),
            Err(MarkupError::InvalidAttribute { .. })
        ));
    }

    #[test]
    fn test_rejects_void_with_children() {
        let node: Node = el("br").text("x").into();
        assert_eq!(
            node.to_html(),
            Err(MarkupError::VoidWithChildren("br".to_string()))
        );
    }

    #[test]
    fn test_maybe_skips_none() {
        let node: Node = el("ul").maybe(None::<Element>).maybe(Some(el("li"))).into();
        assert_eq!(node.to_html().unwrap(), "<ul><li></li></ul>");
    }
}
