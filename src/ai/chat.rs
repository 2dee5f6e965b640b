//! Chat test: one message to the configured model with the chat system prompt.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::config::{AiConfig, AiPrompts, Feature};
use super::model::{CompletionRequest, LanguageModel};
use crate::auth::Identity;
use crate::error::AiError;

pub const MAX_MESSAGE_CHARS: usize = 4000;

#[derive(Debug, Clone, Deserialize)]
pub struct ChatTestRequest {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatTestReply {
    pub reply: String,
    pub model: String,
}

pub async fn chat_test(
    identity: Option<&Identity>,
    config: &AiConfig,
    prompts: &AiPrompts,
    model: &dyn LanguageModel,
    request: ChatTestRequest,
) -> Result<ChatTestReply, AiError> {
    identity.ok_or(AiError::NotAuthenticated)?;
    let message = request.message.trim();
    if message.is_empty() {
        return Err(AiError::Validation("message is required".into()));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AiError::Validation(format!(
            "message must be at most {} characters",
            MAX_MESSAGE_CHARS
        )));
    }
    config.require(Feature::ChatTest)?;

    let reply = model
        .complete(CompletionRequest {
            system: prompts.chat_system.clone(),
            prompt: message.to_string(),
            json: false,
        })
        .await?;
    info!(model = %model.model_name(), chars = reply.len(), "chat test answered");
    Ok(ChatTestReply {
        reply,
        model: model.model_name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::model::CannedModel;

    fn enabled() -> AiConfig {
        AiConfig {
            api_key: "k".into(),
            enabled: true,
            ..AiConfig::default()
        }
    }

    fn ask(message: &str) -> ChatTestRequest {
        ChatTestRequest {
            message: message.into(),
        }
    }

    #[tokio::test]
    async fn test_reply_uses_system_prompt() {
        let model = CannedModel::new("Hello there");
        let prompts = AiPrompts {
            chat_system: "Be terse.".into(),
            ..AiPrompts::default()
        };
        let reply = chat_test(Some(&Identity::new("u1")), &enabled(), &prompts, &model, ask(" hi "))
            .await
            .unwrap();
        assert_eq!(reply.reply, "Hello there");
        assert_eq!(reply.model, "canned");

        let sent = model.requests();
        assert_eq!(sent[0].system, "Be terse.");
        assert_eq!(sent[0].prompt, "hi");
        assert!(!sent[0].json);
    }

    #[tokio::test]
    async fn test_rejections() {
        let model = CannedModel::new("x");
        let prompts = AiPrompts::default();
        let me = Identity::new("u1");

        assert!(matches!(
            chat_test(None, &enabled(), &prompts, &model, ask("hi")).await,
            Err(AiError::NotAuthenticated)
        ));
        assert!(matches!(
            chat_test(Some(&me), &enabled(), &prompts, &model, ask("  ")).await,
            Err(AiError::Validation(_))
        ));
        let long = "a".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(chat_test(Some(&me), &enabled(), &prompts, &model, ask(&long)).await.is_err());

        let mut off = enabled();
        off.features.chat_test = false;
        assert!(matches!(
            chat_test(Some(&me), &off, &prompts, &model, ask("hi")).await,
            Err(AiError::Disabled(_))
        ));
        assert!(model.requests().is_empty());
    }
}
