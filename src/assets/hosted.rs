//! Hosted object storage over the backend's storage REST API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::storage::{ObjectStorage, StoredObject, public_object_url};
use crate::error::AssetError;

/// Files the storage service creates to keep empty folders alive.
const PLACEHOLDER: &str = ".emptyFolderPlaceholder";

const LIST_LIMIT: u32 = 100;

#[derive(Debug, Clone)]
pub struct HostedStorage {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    bucket: String,
}

#[derive(Debug, Deserialize)]
struct ListedObject {
    name: String,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    metadata: Option<ObjectMetadata>,
}

#[derive(Debug, Deserialize)]
struct ObjectMetadata {
    #[serde(default)]
    size: u64,
    #[serde(default)]
    mimetype: Option<String>,
}

impl HostedStorage {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            bucket: bucket.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/storage/v1/{}", self.base_url, path)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, AssetError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| AssetError::Storage(format!("request failed: {}", e)))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AssetError::Storage(format!(
            "{} {}",
            status.as_u16(),
            error_message(&body)
        )))
    }
}

/// Pull the `message`/`error` field out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl ObjectStorage for HostedStorage {
    async fn list(&self, folder: &str) -> Result<Vec<StoredObject>, AssetError> {
        let url = self.endpoint(&format!("object/list/{}", self.bucket));
        debug!(folder, "listing objects");
        let response = self
            .send(self.client.post(url).json(&json!({
                "prefix": folder.trim_end_matches('/'),
                "limit": LIST_LIMIT,
                "offset": 0,
                "sortBy": { "column": "created_at", "order": "desc" },
            })))
            .await?;
        let listed: Vec<ListedObject> = response
            .json()
            .await
            .map_err(|e| AssetError::Storage(format!("invalid list response: {}", e)))?;

        Ok(listed
            .into_iter()
            .filter(|o| o.name != PLACEHOLDER)
            // Sub-folders come back without metadata.
            .filter_map(|o| {
                let metadata = o.metadata?;
                Some(StoredObject {
                    name: o.name,
                    size: metadata.size,
                    content_type: metadata.mimetype,
                    updated_at: o.updated_at,
                })
            })
            .collect())
    }

    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), AssetError> {
        let url = self.endpoint(&format!("object/{}/{}", self.bucket, path));
        self.send(
            self.client
                .post(url)
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .header("x-upsert", "false")
                .body(bytes),
        )
        .await?;
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> Result<(), AssetError> {
        let url = self.endpoint("object/move");
        self.send(self.client.post(url).json(&json!({
            "bucketId": self.bucket,
            "sourceKey": from,
            "destinationKey": to,
        })))
        .await?;
        Ok(())
    }

    async fn remove(&self, paths: &[String]) -> Result<(), AssetError> {
        let url = self.endpoint(&format!("object/{}", self.bucket));
        self.send(self.client.delete(url).json(&json!({ "prefixes": paths })))
            .await?;
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        public_object_url(&self.base_url, &self.bucket, path)
    }
}
