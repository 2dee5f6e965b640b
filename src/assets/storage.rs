//! Object storage seam.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AssetError;

/// One stored object, as listed inside a folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Name relative to the listed folder.
    pub name: String,
    pub size: u64,
    pub content_type: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A bucket of objects addressed by `/`-separated paths.
///
/// Implementations do no authorization of their own; callers scope every
/// path to the caller's identity first.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Objects directly inside `folder` (no trailing slash), newest first.
    async fn list(&self, folder: &str) -> Result<Vec<StoredObject>, AssetError>;

    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), AssetError>;

    async fn rename(&self, from: &str, to: &str) -> Result<(), AssetError>;

    async fn remove(&self, paths: &[String]) -> Result<(), AssetError>;

    /// Publicly reachable URL for `path`.
    fn public_url(&self, path: &str) -> String;
}

/// Public URL layout shared by both storage backends.
pub fn public_object_url(base_url: &str, bucket: &str, path: &str) -> String {
    format!(
        "{}/storage/v1/object/public/{}/{}",
        base_url.trim_end_matches('/'),
        bucket,
        path.trim_start_matches('/')
    )
}
