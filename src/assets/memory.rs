//! In-memory object storage, for tests and offline runs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::storage::{ObjectStorage, StoredObject, public_object_url};
use crate::error::AssetError;

#[derive(Debug, Clone)]
struct Entry {
    bytes: Vec<u8>,
    content_type: String,
    updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct MemoryStorage {
    base_url: String,
    bucket: String,
    objects: RwLock<BTreeMap<String, Entry>>,
}

impl MemoryStorage {
    pub fn new(base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bucket: bucket.into(),
            objects: RwLock::new(BTreeMap::new()),
        }
    }

    /// Raw bytes stored at `path`.
    pub async fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(path).map(|e| e.bytes.clone())
    }

    /// Resolve a public URL produced by [`ObjectStorage::public_url`] back to
    /// its bytes, the way the storage CDN would serve it.
    pub async fn fetch_public(&self, url: &str) -> Option<Vec<u8>> {
        let prefix = public_object_url(&self.base_url, &self.bucket, "");
        let path = url.strip_prefix(&prefix)?;
        self.get(path).await
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn list(&self, folder: &str) -> Result<Vec<StoredObject>, AssetError> {
        let prefix = format!("{}/", folder.trim_end_matches('/'));
        let objects = self.objects.read().await;
        let mut listed: Vec<StoredObject> = objects
            .iter()
            .filter_map(|(path, entry)| {
                let name = path.strip_prefix(&prefix)?;
                (!name.contains('/')).then(|| StoredObject {
                    name: name.to_string(),
                    size: entry.bytes.len() as u64,
                    content_type: Some(entry.content_type.clone()),
                    updated_at: Some(entry.updated_at),
                })
            })
            .collect();
        listed.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.name.cmp(&b.name)));
        Ok(listed)
    }

    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), AssetError> {
        let mut objects = self.objects.write().await;
        if objects.contains_key(path) {
            return Err(AssetError::Storage(format!("object already exists: {}", path)));
        }
        objects.insert(
            path.to_string(),
            Entry {
                bytes,
                content_type: content_type.to_string(),
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> Result<(), AssetError> {
        let mut objects = self.objects.write().await;
        if objects.contains_key(to) {
            return Err(AssetError::Storage(format!("object already exists: {}", to)));
        }
        let mut entry = objects
            .remove(from)
            .ok_or_else(|| AssetError::Storage(format!("object not found: {}", from)))?;
        entry.updated_at = Utc::now();
        objects.insert(to.to_string(), entry);
        Ok(())
    }

    async fn remove(&self, paths: &[String]) -> Result<(), AssetError> {
        let mut objects = self.objects.write().await;
        for path in paths {
            objects.remove(path);
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        public_object_url(&self.base_url, &self.bucket, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_is_scoped_to_folder() {
        let storage = MemoryStorage::new("http://localhost", "assets");
        storage.upload("a/one.png", vec![1], "image/png").await.unwrap();
        storage.upload("a/sub/two.png", vec![2], "image/png").await.unwrap();
        storage.upload("b/three.png", vec![3], "image/png").await.unwrap();

        let listed = storage.list("a").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "one.png");
        assert_eq!(listed[0].size, 1);
    }

    #[tokio::test]
    async fn test_rename_and_fetch_public() {
        let storage = MemoryStorage::new("http://localhost", "assets");
        storage.upload("a/x.png", vec![9, 9], "image/png").await.unwrap();
        storage.rename("a/x.png", "a/y.png").await.unwrap();
        assert!(storage.get("a/x.png").await.is_none());

        let url = storage.public_url("a/y.png");
        assert_eq!(storage.fetch_public(&url).await, Some(vec![9, 9]));
        assert!(storage.rename("a/missing.png", "a/z.png").await.is_err());
    }
}
