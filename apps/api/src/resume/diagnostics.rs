//! Non-fatal problems found while parsing or rendering.
//!
//! A diagnostic never aborts anything: the offending piece of data is dropped
//! or rendered empty and work continues. Each one is logged at `warn` when it
//! is recorded and kept so callers can surface it.

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Diagnostic {
    #[error("expected to find a job named '{parent}' for a company project")]
    UnresolvedParent { parent: String },

    #[error("entry {index} has none of the recognised fields (found: {fields})")]
    UnrecognizedEntry { index: usize, fields: String },

    #[error("entry {index} ({kind}) could not be read: {reason}")]
    MalformedEntry {
        index: usize,
        kind: &'static str,
        reason: String,
    },

    #[error("'{field}' contains a non-entity value; skipped")]
    MalformedContextEntry { field: String },

    #[error("linked field '{field}' is missing")]
    MissingLinkedField { field: String },
}

/// Ordered collection of diagnostics from one parse or render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs and records a diagnostic.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        warn!(%diagnostic, "resume diagnostic");
        self.0.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }
}
