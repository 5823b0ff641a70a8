pub mod health;
pub mod page;
pub mod view;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interactive page
        .route("/", get(page::handle_page))
        // JSON API
        .route("/api/v1/resume", get(view::handle_get_resume))
        .route("/api/v1/tags", get(view::handle_list_tags))
        .route("/api/v1/tags/:id", get(view::handle_get_tag))
        .route("/api/v1/view", post(view::handle_render_view))
        .with_state(state)
}
