//! Server state and configuration.

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::{HeaderMap, header};

use crate::ai::{ConfigStore, ModelSource, SystemResolver, TxtResolver};
use crate::assets::{AssetGallery, HostedStorage};
use crate::auth::{HostedAuth, Identity, IdentityProvider};
use crate::error::{AuthError, MailflowError};
use crate::templates::{HostedTemplates, TemplateStore};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Hosted backend base URL (auth, storage and database)
    pub storage_url: String,
    /// Service API key for the hosted backend
    pub storage_key: String,
    /// Storage bucket holding user assets
    pub bucket: String,
    /// Directory of `ai-config.json` and `ai-prompts.json`
    pub config_dir: PathBuf,
}

/// Application state shared across handlers.
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub gallery: AssetGallery,
    pub templates: Arc<dyn TemplateStore>,
    pub ai_settings: ConfigStore,
    pub resolver: Arc<dyn TxtResolver>,
    pub models: ModelSource,
}

impl AppState {
    /// State wired to the hosted backend, the system resolver and the
    /// configured language-model provider. One HTTP client is shared.
    pub fn hosted(config: &ServerConfig) -> Result<Self, MailflowError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("mailflow/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MailflowError::Server(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            identity: Arc::new(HostedAuth::new(
                client.clone(),
                &config.storage_url,
                &config.storage_key,
            )),
            gallery: AssetGallery::new(Arc::new(HostedStorage::new(
                client.clone(),
                &config.storage_url,
                &config.storage_key,
                &config.bucket,
            ))),
            templates: Arc::new(HostedTemplates::new(
                client.clone(),
                &config.storage_url,
                &config.storage_key,
            )),
            ai_settings: ConfigStore::new(&config.config_dir),
            resolver: Arc::new(SystemResolver::from_system_conf()?),
            models: ModelSource::Http(client),
        })
    }

    /// The caller behind the request's bearer token, if any.
    pub async fn caller(&self, headers: &HeaderMap) -> Result<Option<Identity>, AuthError> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty());
        match token {
            Some(token) => self.identity.identify(token).await,
            None => Ok(None),
        }
    }
}
