//! Asset gallery handlers.

use axum::{
    Json,
    extract::{Multipart, State},
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::{ActionResult, ApiError, success};
use crate::assets::UploadFile;
use crate::server::state::AppState;

/// Request body for the rename endpoint.
#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    #[serde(alias = "oldPath")]
    pub old_path: String,
    #[serde(alias = "newName")]
    pub new_name: String,
}

/// Request body for the remove endpoint.
#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    pub paths: Vec<String>,
}

/// GET /api/assets - Everything in the caller's folder.
pub async fn list(State(state): State<Arc<AppState>>, headers: HeaderMap) -> ActionResult {
    let caller = state.caller(&headers).await?;
    success(state.gallery.list(caller.as_ref()).await?)
}

/// POST /api/assets - Upload the multipart `file` field.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> ActionResult {
    let caller = state.caller(&headers).await?;
    if caller.is_none() {
        return Err(ApiError::unauthorized());
    }

    let mut file: Option<UploadFile> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;
            file = Some(UploadFile {
                filename,
                bytes: bytes.to_vec(),
            });
            break;
        }
    }

    let file = file.ok_or_else(|| ApiError::bad_request("No file field found"))?;
    success(state.gallery.upload(caller.as_ref(), file).await?)
}

/// POST /api/assets/rename - Rename one file; answers with the new path.
pub async fn rename(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<RenameRequest>,
) -> ActionResult {
    let caller = state.caller(&headers).await?;
    let new_path = state
        .gallery
        .rename(caller.as_ref(), &request.old_path, &request.new_name)
        .await?;
    success(json!({ "new_path": new_path }))
}

/// POST /api/assets/remove - Delete files.
pub async fn remove(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<RemoveRequest>,
) -> ActionResult {
    let caller = state.caller(&headers).await?;
    state.gallery.remove(caller.as_ref(), &request.paths).await?;
    success(json!({ "removed": request.paths.len() }))
}
