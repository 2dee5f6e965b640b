//! # Asset Gallery
//!
//! Per-user image library backed by object storage. Every file lives under
//! the caller's identity folder (`{user_id}/{filename}`) and is served from
//! a public URL.
//!
//! All operations require an identity. Input is validated before any call
//! to the storage backend, and storage failures are reported once, without
//! retries.

mod hosted;
mod memory;
mod storage;

pub use hosted::HostedStorage;
pub use memory::MemoryStorage;
pub use storage::{ObjectStorage, StoredObject, public_object_url};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::auth::Identity;
use crate::error::AssetError;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// A listed asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetFile {
    pub name: String,
    /// Storage path, `{user_id}/{name}`.
    pub path: String,
    pub url: String,
    pub size: u64,
    pub content_type: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Result of [`AssetGallery::list`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListResult {
    pub files: Vec<AssetFile>,
    /// Public URL of the caller's folder; `{base_url}/{name}` is a file's URL.
    pub base_url: String,
}

/// A file received from the client.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Result of [`AssetGallery::upload`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedFile {
    pub name: String,
    pub path: String,
    pub url: String,
}

/// Keep ASCII letters, digits, `.`, `-` and `_`; everything else becomes `-`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let mut out = String::with_capacity(base.len());
    for c in base.chars() {
        let c = if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
            c
        } else {
            '-'
        };
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    let out = out.trim_start_matches(['.', '-']).trim_end_matches('-');
    if out.is_empty() {
        "file".to_string()
    } else {
        out.to_string()
    }
}

/// The image MIME type implied by the file extension, if it is one.
pub fn image_mime(filename: &str) -> Option<String> {
    mime_guess::from_path(filename)
        .iter()
        .find(|m| m.type_() == mime_guess::mime::IMAGE)
        .map(|m| m.essence_str().to_string())
}

fn validate_upload(file: &UploadFile) -> Result<String, AssetError> {
    if file.bytes.is_empty() {
        return Err(AssetError::Validation("file is empty".into()));
    }
    if file.bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AssetError::Validation(format!(
            "file is larger than {} MB",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }
    image_mime(&file.filename)
        .ok_or_else(|| AssetError::Validation("only image files can be uploaded".into()))
}

fn require(identity: Option<&Identity>) -> Result<&Identity, AssetError> {
    identity.ok_or(AssetError::NotAuthenticated)
}

fn require_owned(identity: &Identity, path: &str) -> Result<(), AssetError> {
    if identity.owns_path(path) {
        Ok(())
    } else {
        Err(AssetError::Validation(format!(
            "path is outside your asset folder: {}",
            path
        )))
    }
}

/// The gallery operations, over any [`ObjectStorage`].
#[derive(Clone)]
pub struct AssetGallery {
    storage: Arc<dyn ObjectStorage>,
}

impl AssetGallery {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self { storage }
    }

    /// Everything in the caller's folder, newest first.
    pub async fn list(&self, identity: Option<&Identity>) -> Result<ListResult, AssetError> {
        let identity = require(identity)?;
        let folder = identity.user_id.as_str();
        let objects = self.storage.list(folder).await?;
        let files = objects
            .into_iter()
            .map(|o| {
                let path = format!("{}{}", identity.prefix(), o.name);
                AssetFile {
                    url: self.storage.public_url(&path),
                    name: o.name,
                    path,
                    size: o.size,
                    content_type: o.content_type,
                    updated_at: o.updated_at,
                }
            })
            .collect();
        Ok(ListResult {
            files,
            base_url: self.storage.public_url(folder),
        })
    }

    /// Store an image under a timestamped, sanitized name.
    pub async fn upload(
        &self,
        identity: Option<&Identity>,
        file: UploadFile,
    ) -> Result<UploadedFile, AssetError> {
        let identity = require(identity)?;
        let content_type = validate_upload(&file)?;
        let name = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_filename(&file.filename)
        );
        let path = format!("{}{}", identity.prefix(), name);
        let size = file.bytes.len();
        self.storage.upload(&path, file.bytes, &content_type).await?;
        info!(path = %path, size, "uploaded asset");
        Ok(UploadedFile {
            url: self.storage.public_url(&path),
            name,
            path,
        })
    }

    /// Rename within the caller's folder. Returns the new path.
    ///
    /// A new name without an extension keeps the old one.
    pub async fn rename(
        &self,
        identity: Option<&Identity>,
        old_path: &str,
        new_name: &str,
    ) -> Result<String, AssetError> {
        let identity = require(identity)?;
        require_owned(identity, old_path)?;
        if new_name.trim().is_empty() {
            return Err(AssetError::Validation("new name cannot be empty".into()));
        }

        let mut name = sanitize_filename(new_name.trim());
        if !name.contains('.') {
            if let Some((_, ext)) = old_path.rsplit_once('.') {
                name = format!("{}.{}", name, ext);
            }
        }
        if image_mime(&name).is_none() {
            return Err(AssetError::Validation(
                "new name must keep an image extension".into(),
            ));
        }

        let new_path = format!("{}{}", identity.prefix(), name);
        if new_path == old_path {
            return Ok(new_path);
        }
        self.storage.rename(old_path, &new_path).await?;
        info!(from = %old_path, to = %new_path, "renamed asset");
        Ok(new_path)
    }

    /// Delete files from the caller's folder.
    pub async fn remove(
        &self,
        identity: Option<&Identity>,
        paths: &[String],
    ) -> Result<(), AssetError> {
        let identity = require(identity)?;
        if paths.is_empty() {
            return Err(AssetError::Validation("no files selected".into()));
        }
        for path in paths {
            require_owned(identity, path)?;
        }
        self.storage.remove(paths).await?;
        info!(count = paths.len(), "removed assets");
        Ok(())
    }
}
