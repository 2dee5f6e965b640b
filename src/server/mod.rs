//! # HTTP Server for the Mailflow Dashboard
//!
//! Exposes the dashboard's server actions as a JSON API: editor palette,
//! template persistence, the asset gallery and the AI flows.
//!
//! ## Usage
//!
//! ```bash
//! mailflow serve --listen 0.0.0.0:8080 --storage-url https://xyz.example.co
//! ```
//!
//! Callers authenticate with `Authorization: Bearer <session token>`.

mod handlers;
mod state;

pub use handlers::ApiError;
pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::assets::MAX_UPLOAD_BYTES;
use crate::error::MailflowError;

/// Build the API router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Editor API
        .route("/api/editor/block-types", get(handlers::editor::list_block_types))
        .route(
            "/api/editor/block-types/:name",
            get(handlers::editor::default_block),
        )
        // Template API
        .route(
            "/api/templates",
            get(handlers::templates::list).post(handlers::templates::save),
        )
        .route("/api/templates/:id", get(handlers::templates::get))
        // Asset API (upload limit leaves room for multipart framing)
        .route(
            "/api/assets",
            get(handlers::assets::list)
                .post(handlers::assets::upload)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 1024 * 1024)),
        )
        .route("/api/assets/rename", post(handlers::assets::rename))
        .route("/api/assets/remove", post(handlers::assets::remove))
        // AI API
        .route("/api/ai/dns-check", post(handlers::ai::dns_check))
        .route("/api/ai/chat-test", post(handlers::ai::chat_test))
        .route(
            "/api/ai/config",
            get(handlers::ai::get_config).put(handlers::ai::put_config),
        )
        .route(
            "/api/ai/prompts",
            get(handlers::ai::get_prompts).put(handlers::ai::put_prompts),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use mailflow::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), mailflow::MailflowError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     storage_url: "https://xyz.example.co".to_string(),
///     storage_key: "service-key".to_string(),
///     bucket: "email-assets".to_string(),
///     config_dir: "config".into(),
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), MailflowError> {
    let app_state = Arc::new(AppState::hosted(&config)?);
    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            MailflowError::Server(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    info!(
        listen = %config.listen_addr,
        backend = %config.storage_url,
        bucket = %config.bucket,
        config_dir = %config.config_dir.display(),
        "mailflow server started"
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| MailflowError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{CannedModel, ConfigStore, ModelSource, StaticResolver};
    use crate::assets::{AssetGallery, MemoryStorage};
    use crate::auth::{Identity, StaticTokens};
    use crate::templates::MemoryTemplates;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const VERDICT: &str = r#"{"spfStatus":"verified","dkimStatus":"verified","dmarcStatus":"unverified","analysis":"DMARC policy is none."}"#;

    fn app(config_dir: &std::path::Path) -> Router {
        let state = AppState {
            identity: Arc::new(StaticTokens::new().with("tok-alice", Identity::new("alice"))),
            gallery: AssetGallery::new(Arc::new(MemoryStorage::new(
                "http://storage.test",
                "assets",
            ))),
            templates: Arc::new(MemoryTemplates::new()),
            ai_settings: ConfigStore::new(config_dir),
            resolver: Arc::new(
                StaticResolver::new().with("shop.example", "v=spf1 include:mailer.example ~all"),
            ),
            models: ModelSource::Fixed(Arc::new(CannedModel::new(VERDICT))),
        };
        router(Arc::new(state))
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_block_types() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let (status, body) =
            call(&app, request("GET", "/api/editor/block-types", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["types"][0]["type"], "column_group");

        let (status, body) =
            call(&app, request("GET", "/api/editor/block-types/heading", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["block"]["content"]["type"], "heading");

        let (status, body) =
            call(&app, request("GET", "/api/editor/block-types/marquee", None, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_templates_require_identity() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let (status, body) = call(&app, request("GET", "/api/templates", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"success": false, "error": "not authenticated"}));

        let (status, _) = call(&app, request("GET", "/api/templates", Some("bogus"), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_template_save_list_get() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let save = json!({"name": "Spring sale", "content": {"blocks": []}});
        let (status, body) =
            call(&app, request("POST", "/api/templates", Some("tok-alice"), Some(save))).await;
        assert_eq!(status, StatusCode::OK);
        let id = body["id"].as_str().unwrap().to_string();

        let (_, body) = call(&app, request("GET", "/api/templates", Some("tok-alice"), None)).await;
        assert_eq!(body["templates"][0]["name"], "Spring sale");

        let uri = format!("/api/templates/{}", id);
        let (status, body) = call(&app, request("GET", &uri, Some("tok-alice"), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["template"]["id"], id.as_str());

        let (status, _) =
            call(&app, request("GET", "/api/templates/missing", Some("tok-alice"), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_asset_upload_multipart() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let boundary = "XBOUNDARY";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"logo.png\"\r\nContent-Type: image/png\r\n\r\nPNGDATA\r\n--{b}--\r\n",
            b = boundary
        );
        let req = Request::builder()
            .method("POST")
            .uri("/api/assets")
            .header(header::AUTHORIZATION, "Bearer tok-alice")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap();
        let (status, body) = call(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["path"].as_str().unwrap().starts_with("alice/"));

        let (_, listed) = call(&app, request("GET", "/api/assets", Some("tok-alice"), None)).await;
        assert_eq!(listed["files"][0]["url"], body["url"]);

        let remove = json!({"paths": ["bob/secret.png"]});
        let remove = request("POST", "/api/assets/remove", Some("tok-alice"), Some(remove));
        let (status, _) = call(&app, remove).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ai_flows_follow_config() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let check = json!({"domain": "shop.example", "dkimPublicKey": "MIGfMA0GCSqGSIb3"});

        let (status, body) = call(
            &app,
            request("POST", "/api/ai/dns-check", Some("tok-alice"), Some(check.clone())),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["success"], false);

        let config = json!({
            "provider": "open_ai",
            "api_key": "sk-live-9876",
            "model": "gpt-4o-mini",
            "enabled": true
        });
        let (status, body) =
            call(&app, request("PUT", "/api/ai/config", Some("tok-alice"), Some(config))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["config"]["api_key"], "****9876");

        let (status, body) =
            call(&app, request("POST", "/api/ai/dns-check", Some("tok-alice"), Some(check))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["spfStatus"], "verified");
        assert_eq!(body["dmarcStatus"], "unverified");
        assert_eq!(body["records"]["spf"][0], "v=spf1 include:mailer.example ~all");

        let stored = ConfigStore::new(dir.path()).load_config();
        assert_eq!(stored.api_key, "sk-live-9876");
    }

    #[tokio::test]
    async fn test_prompt_validation() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let prompts = json!({"dns_verification": "", "chat_system": "hi"});
        let (status, body) =
            call(&app, request("PUT", "/api/ai/prompts", Some("tok-alice"), Some(prompts))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let (_, body) =
            call(&app, request("GET", "/api/ai/prompts", Some("tok-alice"), None)).await;
        assert!(body["prompts"]["dns_verification"].as_str().unwrap().contains("{{domain}}"));
    }
}
