//! Display Controller: re-renders from the pristine template on every
//! filter change.
//!
//! Shared read paths (the HTTP host) call `render`, which never touches the
//! displayed tree. A single-owner view calls `display`, which swaps the
//! freshly hydrated tree in for the previous one.
#![allow(dead_code)]

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::models::filter::FilterState;
use crate::models::resume::ResumeModel;
use crate::render::hydrator::{Hydrator, Rendered};
use crate::render::node::Element;
use crate::render::template::Template;
use crate::resume::parser::ParsedDocument;

#[derive(Debug)]
pub struct DisplayController {
    model: Arc<ResumeModel>,
    template: Arc<Template>,
    linked_fields: Vec<String>,
    current: Option<Element>,
}

impl DisplayController {
    /// Only a finished parse can be displayed.
    pub fn new(document: ParsedDocument, template: Template, linked_fields: Vec<String>) -> Self {
        Self::from_parts(Arc::new(document.model), Arc::new(template), linked_fields)
    }

    pub fn from_parts(
        model: Arc<ResumeModel>,
        template: Arc<Template>,
        linked_fields: Vec<String>,
    ) -> Self {
        Self {
            model,
            template,
            linked_fields,
            current: None,
        }
    }

    /// Hydrates a fresh tree for `filter` without replacing the displayed one.
    #[instrument(skip(self))]
    pub fn render(&self, filter: Option<&FilterState>) -> Rendered {
        let rendered = Hydrator::new(&self.model, filter, &self.linked_fields).hydrate(&self.template);
        debug!(diagnostics = rendered.diagnostics.len(), "view rendered");
        rendered
    }

    /// Renders for `filter` and replaces the displayed tree with the result.
    pub fn display(&mut self, filter: Option<&FilterState>) -> &Element {
        let Rendered { tree, .. } = self.render(filter);
        self.current.insert(tree)
    }

    pub fn displayed(&self) -> Option<&Element> {
        self.current.as_ref()
    }

    pub fn model(&self) -> &Arc<ResumeModel> {
        &self.model
    }

    pub fn pristine(&self) -> &Template {
        &self.template
    }

    pub fn linked_fields(&self) -> &[String] {
        &self.linked_fields
    }
}
