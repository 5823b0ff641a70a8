// Resume engine: entity parsing, tag registry, relevance scoring,
// description selection and visibility filtering.
// Everything here is synchronous and works on an already-loaded document.

pub mod context;
pub mod diagnostics;
pub mod format;
pub mod parser;
pub mod scoring;
pub mod selector;
pub mod tags;
pub mod visibility;
