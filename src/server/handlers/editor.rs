//! Editor palette handlers.

use axum::extract::Path;

use super::{ActionResult, ApiError, success};
use crate::editor::{block_types, default_primitive};

/// GET /api/editor/block-types - Palette entries.
pub async fn list_block_types() -> ActionResult {
    success(serde_json::json!({ "types": block_types() }))
}

/// GET /api/editor/block-types/:name - A fresh primitive with editor defaults.
pub async fn default_block(Path(name): Path<String>) -> ActionResult {
    let primitive = default_primitive(&name)
        .ok_or_else(|| ApiError::bad_request(format!("Unknown block type: {}", name)))?;
    success(serde_json::json!({ "block": primitive }))
}
