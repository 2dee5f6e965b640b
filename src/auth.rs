//! Caller identity.
//!
//! Sessions are owned by the hosted identity provider. This module only
//! turns a bearer token into an [`Identity`]; the identity's user id is the
//! namespace for stored assets and templates.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthError;

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "id")]
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
        }
    }

    /// Storage folder owned by this identity, e.g. `"3f2a.../"`.
    pub fn prefix(&self) -> String {
        format!("{}/", self.user_id)
    }

    /// True if `path` lives directly or indirectly under this identity's folder.
    pub fn owns_path(&self, path: &str) -> bool {
        path.strip_prefix(&self.prefix()).is_some_and(|rest| {
            !rest.is_empty() && !rest.split('/').any(|s| s == ".." || s.is_empty())
        })
    }
}

/// Resolves bearer tokens to identities.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` for an unknown or expired token; `Err` only when the
    /// provider itself could not be reached.
    async fn identify(&self, token: &str) -> Result<Option<Identity>, AuthError>;
}

/// The hosted backend's auth API (`GET /auth/v1/user`).
#[derive(Debug, Clone)]
pub struct HostedAuth {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HostedAuth {
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
}

#[async_trait]
impl IdentityProvider for HostedAuth {
    async fn identify(&self, token: &str) -> Result<Option<Identity>, AuthError> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .bearer_auth(token)
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            debug!(status = status.as_u16(), "token rejected");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AuthError::Provider(format!("status {}", status.as_u16())));
        }
        let identity = response
            .json::<Identity>()
            .await
            .map_err(|e| AuthError::Provider(format!("invalid user response: {}", e)))?;
        Ok(Some(identity))
    }
}

/// Fixed token table, for tests and local development.
#[derive(Debug, Clone, Default)]
pub struct StaticTokens {
    tokens: HashMap<String, Identity>,
}

impl StaticTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.tokens.insert(token.into(), identity);
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticTokens {
    async fn identify(&self, token: &str) -> Result<Option<Identity>, AuthError> {
        Ok(self.tokens.get(token).cloned())
    }
}
