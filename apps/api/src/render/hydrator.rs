//! Template Hydrator: rewrites the pristine template with resume data.
//!
//! # Algorithm
//! - The root is hydrated as a collection holding the single resume context.
//! - `hydrate_leaf`: the first binding the context can satisfy wins. An empty
//!   node takes the value as its content; a node with children becomes a
//!   collection over the value. Otherwise `desc` and `tagButton` nodes are
//!   filled in, and any other node has its children hydrated against the
//!   same context.
//! - `hydrate_collection`: for every visible entry the node's children are
//!   instantiated again. A `heading` child is held back and only emitted in
//!   front of the next element sibling that ends up with content.
//!
//! Hydration only reads the template and always builds a new tree.

use tracing::debug;

use crate::models::filter::{toggle_tag, FilterState};
use crate::models::resume::ResumeModel;
use crate::render::node::{link_for, Element, Node};
use crate::render::template::{Binding, Template, TemplateElement, TemplateNode, TAG_BUTTON_MARKER};
use crate::resume::context::{CollectionEntry, Context, FieldValue};
use crate::resume::diagnostics::{Diagnostic, Diagnostics};
use crate::resume::selector::best_description_text;
use crate::resume::visibility::is_context_visible;

/// Class carried by an active tag-toggle control.
pub const SELECTED_CLASS: &str = "selected";
/// Attribute holding the encoded filter state a toggle leads to.
pub const FILTER_ATTR: &str = "data-filter";

/// A freshly hydrated tree plus what was skipped while building it.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub tree: Element,
    pub diagnostics: Diagnostics,
}

pub struct Hydrator<'a> {
    model: &'a ResumeModel,
    filter: Option<&'a FilterState>,
    linked_fields: &'a [String],
    diagnostics: Diagnostics,
}

impl<'a> Hydrator<'a> {
    pub fn new(
        model: &'a ResumeModel,
        filter: Option<&'a FilterState>,
        linked_fields: &'a [String],
    ) -> Self {
        Self {
            model,
            filter,
            linked_fields,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Hydrates the whole template against the resume.
    pub fn hydrate(mut self, template: &Template) -> Rendered {
        let root = Context::Resume(self.model);
        let tree = self.hydrate_collection(
            template.root(),
            vec![CollectionEntry::Entity(root)],
            "resume",
            true,
        );
        debug!(diagnostics = self.diagnostics.len(), "template hydrated");
        Rendered {
            tree,
            diagnostics: self.diagnostics,
        }
    }

    pub fn hydrate_leaf(&mut self, node: &TemplateElement, context: Context<'a>) -> Element {
        for Binding { marker, field } in &node.bindings {
            let Some(value) = context.bind(marker, field, self.model) else {
                continue;
            };
            if node.children.is_empty() {
                let mut element = node.shell();
                element.children = render_value(value, node.roles.link);
                return element;
            }
            return self.hydrate_collection(node, value.into_entries(), marker, field.always_shown());
        }

        if node.roles.link && context.is_meta() {
            if let Some(missing) = self.missing_linked_field(node) {
                self.diagnostics
                    .emit(Diagnostic::MissingLinkedField { field: missing });
                return node.shell();
            }
        }

        if node.roles.desc {
            let mut element = node.shell();
            let text = best_description_text(context.entity_descriptions(), self.filter);
            if !text.is_empty() {
                element.children.push(Node::markup(text));
            }
            return element;
        }

        if node.roles.tag_button {
            return self.tag_button(node, context);
        }

        let mut element = node.shell();
        element.children = node
            .children
            .iter()
            .map(|child| self.hydrate_node(child, context))
            .collect();
        element
    }

    pub fn hydrate_collection(
        &mut self,
        node: &TemplateElement,
        entries: Vec<CollectionEntry<'a>>,
        field: &str,
        force_display: bool,
    ) -> Element {
        let mut element = node.shell();

        for entry in entries {
            let context = match entry {
                CollectionEntry::Entity(context) => context,
                CollectionEntry::Malformed => {
                    self.diagnostics.emit(Diagnostic::MalformedContextEntry {
                        field: field.to_string(),
                    });
                    continue;
                }
            };

            let shown = force_display
                || context.is_meta()
                || is_context_visible(&context, self.model, self.filter);
            if !shown {
                continue;
            }

            let mut heading: Option<Node> = None;
            for child in &node.children {
                match child {
                    TemplateNode::Element(el) if el.roles.heading => {
                        heading = Some(Node::Element(el.to_element()));
                    }
                    TemplateNode::Element(el) => {
                        let hydrated = self.hydrate_leaf(el, context);
                        if let Some(heading) = heading.take() {
                            if hydrated.has_content() {
                                element.children.push(heading);
                            }
                        }
                        element.children.push(Node::Element(hydrated));
                    }
                    TemplateNode::Text(text) => element.children.push(Node::text(text.clone())),
                }
            }
        }

        element
    }

    fn hydrate_node(&mut self, node: &TemplateNode, context: Context<'a>) -> Node {
        match node {
            TemplateNode::Text(text) => Node::text(text.clone()),
            TemplateNode::Element(el) => Node::Element(self.hydrate_leaf(el, context)),
        }
    }

    /// A configured linked field this node binds that the meta block lacks.
    fn missing_linked_field(&self, node: &TemplateElement) -> Option<String> {
        node.bindings
            .iter()
            .map(|binding| &binding.marker)
            .find(|marker| self.linked_fields.iter().any(|f| f == *marker))
            .cloned()
    }

    /// Toggle control for a tag context, embedding the state a click leads to.
    fn tag_button(&mut self, node: &TemplateElement, context: Context<'a>) -> Element {
        let mut element = node.shell();
        element.classes.clear();

        let Context::Tag { record, .. } = context else {
            self.diagnostics.emit(Diagnostic::MalformedContextEntry {
                field: TAG_BUTTON_MARKER.to_string(),
            });
            return element;
        };

        let toggle = toggle_tag(self.filter, &record.id);
        let mut button = Element::new("span")
            .with_class(TAG_BUTTON_MARKER)
            .with_attr(FILTER_ATTR, toggle.next.encode())
            .with_child(Node::text(record.title.clone()));
        if toggle.selected {
            button = button.with_class(SELECTED_CLASS);
        }
        element.children.push(Node::Element(button));
        element
    }
}

/// Content for an empty node bound to `value`.
fn render_value(value: FieldValue<'_>, as_link: bool) -> Vec<Node> {
    let node = match value {
        FieldValue::Text(text) if as_link && !text.is_empty() => Node::Element(link_for(&text)),
        FieldValue::Text(text) => Node::text(text.into_owned()),
        FieldValue::Markup(html) => Node::markup(html),
        FieldValue::Link(url) => Node::Element(link_for(url)),
        FieldValue::Texts(items) => Node::text(items.join(", ")),
        FieldValue::Contexts(contexts) => {
            let joined = contexts
                .iter()
                .map(|c| c.label())
                .collect::<Vec<_>>()
                .join(", ");
            if contexts.iter().any(|c| matches!(c, Context::Description(_))) {
                Node::markup(joined)
            } else {
                Node::text(joined)
            }
        }
    };
    if node.is_empty() {
        Vec::new()
    } else {
        vec![node]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::html::to_html;
    use crate::resume::parser::{parse_document, ParseOptions, DEFAULT_LINKED_META_FIELDS};
    use serde_json::{json, Value};

    fn model(entries: Value) -> ResumeModel {
        let Value::Array(entries) = entries else {
            unreachable!()
        };
        parse_document(entries, &ParseOptions::default()).model
    }

    fn linked() -> Vec<String> {
        DEFAULT_LINKED_META_FIELDS.iter().map(|f| f.to_string()).collect()
    }

    fn render(model: &ResumeModel, template: &str, filter: Option<&FilterState>) -> Rendered {
        let template = Template::from_yaml(template).unwrap();
        let linked = linked();
        Hydrator::new(model, filter, &linked).hydrate(&template)
    }

    fn sample() -> ResumeModel {
        model(json!([
            { "meta": { "name": "Sam Doe", "email": "sam@example.com", "gitHub": "github.com/sam" } },
            { "company": "Acme", "title": "Engineer", "time": "2019", "tags": ["Rust"],
              "descs": ["Generic", { "text": "Wrote *Rust*", "tags": ["Rust"], "importance": 40 }] },
            { "companyProject": "Acme", "title": "Ingest", "tags": ["Kafka"], "descs": ["Streams"] },
            { "company": "Globex", "title": "Analyst", "tags": ["Excel"], "descs": ["Spreadsheets"] },
            { "company": "Initech", "importance": 10, "descs": ["TPS reports"] },
            { "education": "State U", "majors": ["CS", "Math"] }
        ]))
    }

    const JOBS: &str = r#"
tag: div
children:
  - tag: section
    class: companies
    children:
      - { tag: h3, class: company }
      - { tag: p, class: desc }
"#;

    fn companies(rendered: &Rendered) -> Vec<String> {
        let mut found = Vec::new();
        rendered.tree.find_all_by_class("company", &mut found);
        found.iter().map(|e| e.inner_text()).collect()
    }

    #[test]
    fn test_default_view_hides_low_importance() {
        let model = sample();
        let rendered = render(&model, JOBS, None);
        assert_eq!(companies(&rendered), vec!["Acme", "Globex"]);
    }

    #[test]
    fn test_tag_filter_prunes_and_rescores() {
        let model = sample();
        let filter = FilterState::with_tags(["rust"]);
        let rendered = render(&model, JOBS, Some(&filter));
        assert_eq!(companies(&rendered), vec!["Acme"]);

        let desc = rendered.tree.find_by_class("desc").unwrap();
        assert_eq!(desc.inner_text(), "Wrote <b>Rust</b>", "tag match outranks importance");

        let rendered = render(&model, JOBS, None);
        let desc = rendered.tree.find_by_class("desc").unwrap();
        assert_eq!(desc.inner_text(), "Generic");
    }

    #[test]
    fn test_nested_project_keeps_parent_visible() {
        let model = sample();
        let filter = FilterState::with_tags(["kafka"]);
        let rendered = render(&model, JOBS, Some(&filter));
        assert_eq!(companies(&rendered), vec!["Acme"]);
    }

    #[test]
    fn test_heading_only_before_non_empty_content() {
        let model = model(json!([
            { "company": "Acme", "alias": "acme", "title": "Engineer" },
            { "company": "Globex", "title": "Analyst" }
        ]));
        let template = r#"
tag: div
children:
  - tag: section
    class: companies
    children:
      - { tag: h4, class: heading, children: ["Also known as"] }
      - { tag: span, class: alias }
"#;
        let rendered = render(&model, template, None);
        let mut headings = Vec::new();
        rendered.tree.find_all_by_class("heading", &mut headings);
        assert_eq!(headings.len(), 1, "Globex has no alias, so no dangling heading");
    }

    #[test]
    fn test_meta_links_and_sorted_tags_always_shown() {
        let model = sample();
        let template = r#"
tag: div
children:
  - tag: header
    class: meta
    children:
      - { tag: h1, class: name }
      - { tag: span, class: "email link" }
      - { tag: span, class: "gitHub link" }
      - { tag: span, class: "linkedIn link" }
  - tag: nav
    class: sortedTags
    children:
      - { tag: span, class: tagButton }
"#;
        let filter = FilterState::with_tags(["excel"]);
        let rendered = render(&model, template, Some(&filter));
        let html = to_html(&rendered.tree);

        assert!(html.contains("<h1 class=\"name\">Sam Doe</h1>"));
        assert!(html.contains("href=\"mailto:sam@example.com\""));
        assert!(html.contains("href=\"https://github.com/sam\""));

        let mut buttons = Vec::new();
        rendered.tree.find_all_by_class(TAG_BUTTON_MARKER, &mut buttons);
        assert_eq!(buttons.len(), model.sorted_tags().len(), "every tag gets a toggle");

        let selected: Vec<_> = buttons
            .iter()
            .filter(|b| b.has_class(SELECTED_CLASS))
            .map(|b| b.inner_text())
            .collect();
        assert_eq!(selected, vec!["Excel"]);

        assert_eq!(
            rendered.diagnostics.iter().collect::<Vec<_>>(),
            vec![&Diagnostic::MissingLinkedField {
                field: "linkedIn".to_string()
            }]
        );
    }

    #[test]
    fn test_meta_fields_named_like_entity_fields_render() {
        let model = model(json!([
            { "meta": { "name": "Sam", "location": "Boston", "title": "Staff Engineer" } }
        ]));
        let template = r#"
tag: div
children:
  - tag: header
    class: meta
    children:
      - { tag: h1, class: name }
      - { tag: span, class: location }
      - { tag: span, class: title }
"#;
        let rendered = render(&model, template, None);
        assert_eq!(
            to_html(&rendered.tree),
            concat!(
                r#"<div><header class="meta"><h1 class="name">Sam</h1>"#,
                r#"<span class="location">Boston</span>"#,
                r#"<span class="title">Staff Engineer</span></header></div>"#
            )
        );
        assert!(rendered.diagnostics.is_empty());
    }

    #[test]
    fn test_tag_button_embeds_toggled_state() {
        let model = sample();
        let template = r#"
tag: div
children:
  - tag: nav
    class: sortedTags
    children:
      - { tag: span, class: tagButton }
"#;
        let current = FilterState {
            tags: vec!["rust".to_string()],
            search: Some("acme".to_string()),
        };
        let rendered = render(&model, template, Some(&current));

        let mut buttons = Vec::new();
        rendered.tree.find_all_by_class(TAG_BUTTON_MARKER, &mut buttons);
        let rust = buttons.iter().find(|b| b.inner_text() == "Rust").unwrap();
        assert!(rust.has_class(SELECTED_CLASS));
        assert_eq!(rust.attrs[FILTER_ATTR], r#"{"tags":[],"search":"acme"}"#);

        let excel = buttons.iter().find(|b| b.inner_text() == "Excel").unwrap();
        assert!(!excel.has_class(SELECTED_CLASS));
        let next = FilterState::decode(&excel.attrs[FILTER_ATTR]).unwrap();
        assert_eq!(next.tags, vec!["rust", "excel"]);
    }

    #[test]
    fn test_text_list_inline_and_malformed_as_collection() {
        let model = sample();
        let template = r#"
tag: div
children:
  - tag: section
    class: educations
    children:
      - { tag: span, class: majors }
      - tag: ul
        class: minors
        children:
          - { tag: li, class: name }
"#;
        let rendered = render(&model, template, None);
        let majors = rendered.tree.find_by_class("majors").unwrap();
        assert_eq!(majors.inner_text(), "CS, Math");
        assert!(rendered.diagnostics.is_empty(), "no minors means no entries");

        let model = self::model(json!([{ "education": "State U", "minors": ["Art"] }]));
        let rendered = render(&model, template, None);
        assert_eq!(
            rendered.diagnostics.iter().collect::<Vec<_>>(),
            vec![&Diagnostic::MalformedContextEntry {
                field: "minors".to_string()
            }]
        );
        let minors = rendered.tree.find_by_class("minors").unwrap();
        assert!(minors.children.is_empty(), "malformed entries are skipped");
    }

    #[test]
    fn test_static_nodes_pass_through() {
        let model = sample();
        let template = r#"
tag: div
children:
  - tag: footer
    attrs: { id: foot }
    children: ["Built with care", { tag: em, children: ["!"] }]
"#;
        let rendered = render(&model, template, None);
        assert_eq!(
            to_html(&rendered.tree),
            r#"<div><footer id="foot">Built with care<em>!</em></footer></div>"#
        );
    }

    #[test]
    fn test_projects_nest_under_jobs() {
        let model = sample();
        let template = r#"
tag: div
children:
  - tag: section
    class: companies
    children:
      - { tag: h3, class: company }
      - tag: ul
        class: projects
        children:
          - { tag: li, class: title }
"#;
        let rendered = render(&model, template, None);
        let mut titles = Vec::new();
        rendered.tree.find_all_by_class("title", &mut titles);
        let titles: Vec<_> = titles.iter().map(|t| t.inner_text()).collect();
        assert_eq!(titles, vec!["Ingest"]);
    }

    #[test]
    fn test_hydration_is_deterministic() {
        let model = sample();
        let filter = FilterState::with_tags(["rust"]);
        let first = render(&model, JOBS, Some(&filter));
        let second = render(&model, JOBS, Some(&filter));
        assert_eq!(first.tree, second.tree);
    }
}
