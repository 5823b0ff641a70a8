use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::filter::FilterState;
use crate::models::resume::ResumeModel;
use crate::render::html::to_html;
use crate::resume::diagnostics::Diagnostics;
use crate::resume::tags::{canonical_id, TagRecord};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub html: String,
    pub diagnostics: Diagnostics,
}

/// GET /api/v1/resume
pub async fn handle_get_resume(State(state): State<AppState>) -> Json<Arc<ResumeModel>> {
    Json(Arc::clone(&state.model))
}

/// GET /api/v1/tags
/// Tags ordered by use count, most used first.
pub async fn handle_list_tags(State(state): State<AppState>) -> Json<Vec<TagRecord>> {
    Json(state.model.sorted_tags().to_vec())
}

/// GET /api/v1/tags/:id
pub async fn handle_get_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TagRecord>, AppError> {
    state
        .model
        .tag(&canonical_id(&id))
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("tag '{id}'")))
}

/// POST /api/v1/view
/// Body is a filter state, or `null` for the default view.
pub async fn handle_render_view(
    State(state): State<AppState>,
    Json(filter): Json<Option<FilterState>>,
) -> Json<ViewResponse> {
    let rendered = state.controller.render(filter.as_ref());
    Json(ViewResponse {
        html: to_html(&rendered.tree),
        diagnostics: rendered.diagnostics,
    })
}
