//! # Template Persistence
//!
//! Saved email templates: a name plus the serialized canvas, owned by one
//! identity. The canvas is stored opaquely as JSON; only the editor reads
//! its structure.

mod hosted;
mod memory;

pub use hosted::HostedTemplates;
pub use memory::MemoryTemplates;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::Identity;
use crate::editor::Canvas;
use crate::error::TemplateError;

pub const MAX_NAME_LEN: usize = 120;

/// A stored template row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub content: Canvas,
    pub updated_at: DateTime<Utc>,
}

/// Listing entry without the canvas body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveTemplateRequest {
    pub name: String,
    pub content: Canvas,
    /// Present when overwriting an existing template.
    #[serde(default, alias = "templateId")]
    pub template_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedTemplate {
    pub id: String,
    pub updated_at: DateTime<Utc>,
}

/// Backing table for templates.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Insert or update by id. An update of a row owned by someone else
    /// must fail with [`TemplateError::NotFound`].
    async fn upsert(&self, template: Template) -> Result<(), TemplateError>;

    async fn get(&self, user_id: &str, id: &str) -> Result<Option<Template>, TemplateError>;

    /// The owner's templates, most recently updated first.
    async fn list(&self, user_id: &str) -> Result<Vec<TemplateSummary>, TemplateError>;
}

fn require(identity: Option<&Identity>) -> Result<&Identity, TemplateError> {
    identity.ok_or(TemplateError::NotAuthenticated)
}

fn validate_name(name: &str) -> Result<String, TemplateError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TemplateError::Validation("template name is required".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(TemplateError::Validation(format!(
            "template name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

/// Create or overwrite a template for the caller.
pub async fn save_template(
    store: &dyn TemplateStore,
    identity: Option<&Identity>,
    request: SaveTemplateRequest,
) -> Result<SavedTemplate, TemplateError> {
    let identity = require(identity)?;
    let name = validate_name(&request.name)?;

    let id = match request.template_id {
        Some(id) if !id.trim().is_empty() => {
            let id = id.trim().to_string();
            if store.get(&identity.user_id, &id).await?.is_none() {
                return Err(TemplateError::NotFound(id));
            }
            id
        }
        _ => uuid::Uuid::new_v4().to_string(),
    };

    let updated_at = Utc::now();
    store
        .upsert(Template {
            id: id.clone(),
            user_id: identity.user_id.clone(),
            name,
            content: request.content,
            updated_at,
        })
        .await?;
    info!(template = %id, "saved template");
    Ok(SavedTemplate { id, updated_at })
}

pub async fn get_template(
    store: &dyn TemplateStore,
    identity: Option<&Identity>,
    id: &str,
) -> Result<Template, TemplateError> {
    let identity = require(identity)?;
    store
        .get(&identity.user_id, id)
        .await?
        .ok_or_else(|| TemplateError::NotFound(id.to_string()))
}

pub async fn list_templates(
    store: &dyn TemplateStore,
    identity: Option<&Identity>,
) -> Result<Vec<TemplateSummary>, TemplateError> {
    let identity = require(identity)?;
    store.list(&identity.user_id).await
}
