//! Template table over the hosted backend's REST data API.

use async_trait::async_trait;
use serde_json::json;

use super::{Template, TemplateStore, TemplateSummary};
use crate::error::TemplateError;

const TABLE: &str = "templates";

#[derive(Debug, Clone)]
pub struct HostedTemplates {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HostedTemplates {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, TABLE)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, TemplateError> {
        let response = request
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| TemplateError::Database(format!("request failed: {}", e)))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(TemplateError::Database(format!(
            "{} {}",
            status.as_u16(),
            body.trim()
        )))
    }
}

#[async_trait]
impl TemplateStore for HostedTemplates {
    async fn upsert(&self, template: Template) -> Result<(), TemplateError> {
        // Only rows owned by the caller are visible to the update, so a
        // foreign id matches nothing and comes back empty.
        let existing = self.get(&template.user_id, &template.id).await?;
        let body = json!({
            "id": template.id,
            "user_id": template.user_id,
            "name": template.name,
            "content": template.content,
            "updated_at": template.updated_at,
        });
        let request = if existing.is_some() {
            self.client
                .patch(self.table_url())
                .query(&[
                    ("id", format!("eq.{}", template.id)),
                    ("user_id", format!("eq.{}", template.user_id)),
                ])
                .header("Prefer", "return=minimal")
                .json(&body)
        } else {
            self.client
                .post(self.table_url())
                .header("Prefer", "return=minimal")
                .json(&body)
        };
        self.send(request).await?;
        Ok(())
    }

    async fn get(&self, user_id: &str, id: &str) -> Result<Option<Template>, TemplateError> {
        let response = self
            .send(self.client.get(self.table_url()).query(&[
                ("select", "*".to_string()),
                ("id", format!("eq.{}", id)),
                ("user_id", format!("eq.{}", user_id)),
                ("limit", "1".to_string()),
            ]))
            .await?;
        let mut rows: Vec<Template> = response
            .json()
            .await
            .map_err(|e| TemplateError::Database(format!("invalid template row: {}", e)))?;
        Ok(rows.pop())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<TemplateSummary>, TemplateError> {
        let response = self
            .send(self.client.get(self.table_url()).query(&[
                ("select", "id,name,updated_at".to_string()),
                ("user_id", format!("eq.{}", user_id)),
                ("order", "updated_at.desc".to_string()),
            ]))
            .await?;
        response
            .json()
            .await
            .map_err(|e| TemplateError::Database(format!("invalid template list: {}", e)))
    }
}
