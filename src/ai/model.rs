//! Language-model client.
//!
//! Every supported provider speaks the chat-completions protocol, so one
//! HTTP client covers them all. [`CannedModel`] answers from a fixed string.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::config::AiConfig;
use crate::error::AiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    /// Ask the provider for a JSON object answer.
    pub json: bool,
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Name of the model answering, for display.
    fn model_name(&self) -> &str;

    async fn complete(&self, request: CompletionRequest) -> Result<String, AiError>;
}

// ============================================================================
// HTTP
// ============================================================================

#[derive(Debug, Clone)]
pub struct HttpModel {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl HttpModel {
    pub fn from_config(client: reqwest::Client, config: &AiConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }

    fn body(&self, request: &CompletionRequest) -> serde_json::Value {
        let mut body = json!({
            "model": self.model,
            "temperature": 0.2,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.prompt},
            ],
        });
        if request.json {
            body["response_format"] = json!({"type": "json_object"});
        }
        body
    }
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

fn first_answer(response: CompletionResponse) -> Result<String, AiError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AiError::Provider("empty answer".into()))
}

#[async_trait]
impl LanguageModel for HttpModel {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, AiError> {
        debug!(model = %self.model, json = request.json, "sending completion");
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&self.body(&request))
            .send()
            .await
            .map_err(|e| AiError::Provider(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AiError::Provider(format!("{} {}", status.as_u16(), text.trim())));
        }
        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::Provider(format!("invalid response: {}", e)))?;
        first_answer(parsed)
    }
}

// ============================================================================
// CANNED
// ============================================================================

/// Fixed answer; records the requests it receives.
#[derive(Debug, Default)]
pub struct CannedModel {
    answer: String,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl CannedModel {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LanguageModel for CannedModel {
    fn model_name(&self) -> &str {
        "canned"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, AiError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request);
        }
        Ok(self.answer.clone())
    }
}

// ============================================================================
// SOURCE
// ============================================================================

/// Where request handlers get a model from. The AI config can change at any
/// time, so the HTTP model is built per request from the current document.
#[derive(Clone)]
pub enum ModelSource {
    Http(reqwest::Client),
    Fixed(Arc<dyn LanguageModel>),
}

impl ModelSource {
    pub fn model(&self, config: &AiConfig) -> Arc<dyn LanguageModel> {
        match self {
            ModelSource::Http(client) => Arc::new(HttpModel::from_config(client.clone(), config)),
            ModelSource::Fixed(model) => model.clone(),
        }
    }
}
