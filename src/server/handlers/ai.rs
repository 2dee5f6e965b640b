//! AI flow and AI settings handlers.

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use std::sync::Arc;

use super::{ActionResult, ApiError, success};
use crate::ai::{self, AiConfig, AiPrompts, ChatTestRequest, DnsCheckRequest};
use crate::server::state::AppState;

/// POST /api/ai/dns-check - Verify a sending domain's DNS records.
pub async fn dns_check(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<DnsCheckRequest>,
) -> ActionResult {
    let caller = state.caller(&headers).await?;
    let config = state.ai_settings.load_config();
    let prompts = state.ai_settings.load_prompts();
    let model = state.models.model(&config);
    let result = ai::verify_domain(
        caller.as_ref(),
        &config,
        &prompts,
        state.resolver.as_ref(),
        model.as_ref(),
        request,
    )
    .await?;
    success(result)
}

/// POST /api/ai/chat-test - One message to the configured model.
pub async fn chat_test(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<ChatTestRequest>,
) -> ActionResult {
    let caller = state.caller(&headers).await?;
    let config = state.ai_settings.load_config();
    let prompts = state.ai_settings.load_prompts();
    let model = state.models.model(&config);
    let reply = ai::chat_test(caller.as_ref(), &config, &prompts, model.as_ref(), request).await?;
    success(reply)
}

/// GET /api/ai/config - Current AI config with the API key masked.
pub async fn get_config(State(state): State<Arc<AppState>>, headers: HeaderMap) -> ActionResult {
    require_caller(&state, &headers).await?;
    success(serde_json::json!({ "config": state.ai_settings.load_config().redacted() }))
}

/// PUT /api/ai/config - Replace the AI config. A blank or masked key keeps
/// the stored one.
pub async fn put_config(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(config): Json<AiConfig>,
) -> ActionResult {
    require_caller(&state, &headers).await?;
    let config = config.keep_secret_from(&state.ai_settings.load_config());
    state.ai_settings.save_config(&config)?;
    success(serde_json::json!({ "config": config.redacted() }))
}

/// GET /api/ai/prompts - Current prompt text.
pub async fn get_prompts(State(state): State<Arc<AppState>>, headers: HeaderMap) -> ActionResult {
    require_caller(&state, &headers).await?;
    success(serde_json::json!({ "prompts": state.ai_settings.load_prompts() }))
}

/// PUT /api/ai/prompts - Replace the prompt text.
pub async fn put_prompts(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(prompts): Json<AiPrompts>,
) -> ActionResult {
    require_caller(&state, &headers).await?;
    state.ai_settings.save_prompts(&prompts)?;
    success(serde_json::json!({ "prompts": prompts }))
}

async fn require_caller(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    match state.caller(headers).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::unauthorized()),
    }
}
