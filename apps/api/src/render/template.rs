//! Pristine template: parsed once, compiled once, never mutated.
//!
//! Templates are YAML node trees. Elements carry a tag, markers (`class`),
//! attributes and children; bare strings are text nodes:
//!
//! ```yaml
//! tag: section
//! class: companies
//! children:
//!   - { tag: h2, class: heading, children: ["Experience"] }
//!   - { tag: h3, class: company }
//!   - { tag: p, class: desc }
//! ```
//!
//! Compilation resolves every marker through the binding table up front, so
//! hydration never compares marker strings against field names.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::render::node::{Element, Node};
use crate::resume::context::Field;

/// Reserved marker: best-description slot.
pub const DESC_MARKER: &str = "desc";
/// Reserved marker: tag-toggle control.
pub const TAG_BUTTON_MARKER: &str = "tagButton";
/// Reserved marker: section header shown only above non-empty content.
pub const HEADING_MARKER: &str = "heading";
/// Reserved marker: render the bound value as a hyperlink.
pub const LINK_MARKER: &str = "link";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("template root must be an element")]
    TextRoot,

    #[error("invalid tag name '{0}'")]
    InvalidTag(String),

    #[error("element <{tag}> sets 'class' as an attribute; use the class field")]
    ClassAttribute { tag: String },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNode {
    Text(String),
    Element(RawElement),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawElement {
    tag: String,
    #[serde(default)]
    class: Markers,
    #[serde(default)]
    attrs: BTreeMap<String, String>,
    #[serde(default)]
    children: Vec<RawNode>,
}

/// Markers written either as one space-separated string or as a list.
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum Markers {
    #[default]
    None,
    Joined(String),
    List(Vec<String>),
}

impl Markers {
    fn into_vec(self) -> Vec<String> {
        match self {
            Markers::None => Vec::new(),
            Markers::Joined(joined) => joined.split_whitespace().map(str::to_string).collect(),
            Markers::List(list) => list
                .iter()
                .flat_map(|m| m.split_whitespace())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// A marker bound to a data field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub marker: String,
    pub field: Field,
}

/// Reserved roles an element can carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Roles {
    pub desc: bool,
    pub tag_button: bool,
    pub heading: bool,
    pub link: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateNode {
    Text(String),
    Element(TemplateElement),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateElement {
    pub tag: String,
    pub markers: Vec<String>,
    pub attrs: BTreeMap<String, String>,
    pub children: Vec<TemplateNode>,
    /// Non-reserved markers in declaration order.
    pub bindings: Vec<Binding>,
    pub roles: Roles,
}

impl TemplateElement {
    /// Output element with this element's tag, markers and attributes but no
    /// children.
    pub fn shell(&self) -> Element {
        Element {
            tag: self.tag.clone(),
            classes: self.markers.clone(),
            attrs: self.attrs.clone(),
            children: Vec::new(),
        }
    }

    /// Static copy of the whole subtree.
    pub fn to_element(&self) -> Element {
        let mut element = self.shell();
        element.children = self.children.iter().map(TemplateNode::to_node).collect();
        element
    }
}

impl TemplateNode {
    pub fn to_node(&self) -> Node {
        match self {
            TemplateNode::Text(text) => Node::text(text.clone()),
            TemplateNode::Element(el) => Node::Element(el.to_element()),
        }
    }
}

/// Marker → field resolutions for one template, built at compile time.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    fields: HashMap<String, Field>,
}

impl BindingTable {
    fn resolve(&mut self, marker: &str) -> Field {
        self.fields
            .entry(marker.to_string())
            .or_insert_with(|| Field::from_marker(marker))
            .clone()
    }

    pub fn get(&self, marker: &str) -> Option<&Field> {
        self.fields.get(marker)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The compiled, immutable template every render starts from.
#[derive(Debug, Clone)]
pub struct Template {
    root: TemplateElement,
    bindings: BindingTable,
}

impl Template {
    pub fn from_yaml(source: &str) -> Result<Self, TemplateError> {
        let raw: RawNode = serde_yaml::from_str(source)?;
        Self::compile(raw)
    }

    fn compile(raw: RawNode) -> Result<Self, TemplateError> {
        let RawNode::Element(root) = raw else {
            return Err(TemplateError::TextRoot);
        };
        let mut bindings = BindingTable::default();
        let root = compile_element(root, &mut bindings)?;
        debug!(markers = bindings.len(), "template compiled");
        Ok(Self { root, bindings })
    }

    pub fn root(&self) -> &TemplateElement {
        &self.root
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }
}

fn compile_element(raw: RawElement, table: &mut BindingTable) -> Result<TemplateElement, TemplateError> {
    if raw.tag.is_empty() || !raw.tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(TemplateError::InvalidTag(raw.tag));
    }
    if raw.attrs.contains_key("class") {
        return Err(TemplateError::ClassAttribute { tag: raw.tag });
    }

    let markers = raw.class.into_vec();
    let mut roles = Roles::default();
    let mut bindings = Vec::new();
    for marker in &markers {
        match marker.as_str() {
            DESC_MARKER => roles.desc = true,
            TAG_BUTTON_MARKER => roles.tag_button = true,
            HEADING_MARKER => roles.heading = true,
            LINK_MARKER => roles.link = true,
            other => bindings.push(Binding {
                marker: other.to_string(),
                field: table.resolve(other),
            }),
        }
    }

    let children = raw
        .children
        .into_iter()
        .map(|child| match child {
            RawNode::Text(text) => Ok(TemplateNode::Text(text)),
            RawNode::Element(el) => compile_element(el, table).map(TemplateNode::Element),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TemplateElement {
        tag: raw.tag,
        markers,
        attrs: raw.attrs,
        children,
        bindings,
        roles,
    })
}
