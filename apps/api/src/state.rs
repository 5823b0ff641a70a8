use std::sync::Arc;

use crate::config::Config;
use crate::models::resume::ResumeModel;
use crate::render::controller::DisplayController;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything behind the `Arc`s is read-only once startup finishes.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<ResumeModel>,
    /// Renders views from the pristine template; handlers only call `render`.
    pub controller: Arc<DisplayController>,
    pub config: Config,
}

impl AppState {
    pub fn new(controller: DisplayController, config: Config) -> Self {
        Self {
            model: Arc::clone(controller.model()),
            controller: Arc::new(controller),
            config,
        }
    }
}
