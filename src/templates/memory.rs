//! In-memory template table.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Template, TemplateStore, TemplateSummary};
use crate::error::TemplateError;

#[derive(Debug, Default)]
pub struct MemoryTemplates {
    rows: RwLock<HashMap<String, Template>>,
}

impl MemoryTemplates {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplates {
    async fn upsert(&self, template: Template) -> Result<(), TemplateError> {
        let mut rows = self.rows.write().await;
        if let Some(existing) = rows.get(&template.id) {
            if existing.user_id != template.user_id {
                return Err(TemplateError::NotFound(template.id));
            }
        }
        rows.insert(template.id.clone(), template);
        Ok(())
    }

    async fn get(&self, user_id: &str, id: &str) -> Result<Option<Template>, TemplateError> {
        Ok(self
            .rows
            .read()
            .await
            .get(id)
            .filter(|t| t.user_id == user_id)
            .cloned())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<TemplateSummary>, TemplateError> {
        let rows = self.rows.read().await;
        let mut list: Vec<TemplateSummary> = rows
            .values()
            .filter(|t| t.user_id == user_id)
            .map(|t| TemplateSummary {
                id: t.id.clone(),
                name: t.name.clone(),
                updated_at: t.updated_at,
            })
            .collect();
        list.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(list)
    }
}
