#![allow(dead_code)]

use std::collections::BTreeMap;

use serde::Serialize;

/// A node of a rendered tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Element(Element),
    /// Plain text, escaped when serialized to HTML.
    Text { text: String },
    /// Trusted markup produced by the inline formatter.
    Markup { html: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub attrs: BTreeMap<String, String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn markup(html: impl Into<String>) -> Self {
        Node::Markup { html: html.into() }
    }

    /// Whether the node contributes anything visible once serialized.
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Element(_) => false,
            Node::Text { text } => text.is_empty(),
            Node::Markup { html } => html.is_empty(),
        }
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// True when the element has any non-empty child.
    pub fn has_content(&self) -> bool {
        self.children.iter().any(|child| !child.is_empty())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// First descendant (or self) carrying `class`, depth first.
    pub fn find_by_class(&self, class: &str) -> Option<&Element> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            Node::Element(el) => el.find_by_class(class),
            _ => None,
        })
    }

    /// Every descendant (and self) carrying `class`, in document order.
    pub fn find_all_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a Element>) {
        if self.has_class(class) {
            found.push(self);
        }
        for child in &self.children {
            if let Node::Element(el) = child {
                el.find_all_by_class(class, found);
            }
        }
    }

    /// Concatenated text and markup of the subtree.
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Node::Element(el) => out.push_str(&el.inner_text()),
                Node::Text { text } => out.push_str(text),
                Node::Markup { html } => out.push_str(html),
            }
        }
        out
    }
}

/// Anchor for a linked field: `mailto:` when the text looks like an address,
/// `https://` otherwise.
pub fn link_for(text: &str) -> Element {
    let href = if text.contains('@') {
        format!("mailto:{text}")
    } else {
        format!("https://{text}")
    };
    Element::new("a")
        .with_attr("href", href)
        .with_attr("target", "_blank")
        .with_child(Node::text(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_for_email() {
        let a = link_for("sam@example.com");
        assert_eq!(a.attrs["href"], "mailto:sam@example.com");
        assert_eq!(a.inner_text(), "sam@example.com");
    }

    #[test]
    fn test_link_for_url() {
        let a = link_for("github.com/sam");
        assert_eq!(a.attrs["href"], "https://github.com/sam");
        assert_eq!(a.attrs["target"], "_blank");
    }

    #[test]
    fn test_has_content_ignores_empty_text() {
        let empty = Element::new("p").with_child(Node::text(""));
        assert!(!empty.has_content());
        let nested = Element::new("div").with_child(Node::Element(Element::new("span")));
        assert!(nested.has_content(), "an element child counts as content");
    }

    #[test]
    fn test_find_by_class_depth_first() {
        let tree = Element::new("div").with_child(Node::Element(
            Element::new("ul").with_child(Node::Element(Element::new("li").with_class("job"))),
        ));
        assert_eq!(tree.find_by_class("job").map(|e| e.tag.as_str()), Some("li"));
        assert!(tree.find_by_class("missing").is_none());
    }
}
