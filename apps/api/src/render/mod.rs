// View rendering: compiled templates, hydration into fresh output trees,
// and HTML serialization.

pub mod controller;
pub mod html;
pub mod hydrator;
pub mod node;
pub mod template;
