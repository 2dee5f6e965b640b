//! Template persistence handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use serde_json::json;
use std::sync::Arc;

use super::{ActionResult, success};
use crate::server::state::AppState;
use crate::templates::{self, SaveTemplateRequest};

/// POST /api/templates - Create or overwrite a template.
pub async fn save(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<SaveTemplateRequest>,
) -> ActionResult {
    let caller = state.caller(&headers).await?;
    let saved = templates::save_template(state.templates.as_ref(), caller.as_ref(), request).await?;
    success(saved)
}

/// GET /api/templates - The caller's templates, newest first.
pub async fn list(State(state): State<Arc<AppState>>, headers: HeaderMap) -> ActionResult {
    let caller = state.caller(&headers).await?;
    let list = templates::list_templates(state.templates.as_ref(), caller.as_ref()).await?;
    success(json!({ "templates": list }))
}

/// GET /api/templates/:id - One template with its canvas.
pub async fn get(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ActionResult {
    let caller = state.caller(&headers).await?;
    let template = templates::get_template(state.templates.as_ref(), caller.as_ref(), &id).await?;
    success(json!({ "template": template }))
}
