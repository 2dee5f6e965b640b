//! HTTP handlers for the server.
//!
//! Every action answers `{"success": true, ...data}` or
//! `{"success": false, "error": message}`.

pub mod ai;
pub mod assets;
pub mod editor;
pub mod templates;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::error::{AiError, AssetError, AuthError, ConfigError, TemplateError};

/// A failed action.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "not authenticated")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(status = self.status.as_u16(), error = %self.message, "action failed");
        }
        (
            self.status,
            Json(json!({"success": false, "error": self.message})),
        )
            .into_response()
    }
}

impl From<AssetError> for ApiError {
    fn from(e: AssetError) -> Self {
        let status = match e {
            AssetError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            AssetError::Validation(_) => StatusCode::BAD_REQUEST,
            AssetError::Storage(_) => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, e.to_string())
    }
}

impl From<TemplateError> for ApiError {
    fn from(e: TemplateError) -> Self {
        let status = match e {
            TemplateError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            TemplateError::Validation(_) => StatusCode::BAD_REQUEST,
            TemplateError::NotFound(_) => StatusCode::NOT_FOUND,
            TemplateError::Database(_) => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, e.to_string())
    }
}

impl From<AiError> for ApiError {
    fn from(e: AiError) -> Self {
        let status = match e {
            AiError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            AiError::Validation(_) => StatusCode::BAD_REQUEST,
            AiError::Disabled(_) => StatusCode::FORBIDDEN,
            AiError::Dns(_) | AiError::Provider(_) => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, e.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(e: ConfigError) -> Self {
        let status = match e {
            ConfigError::Invalid(_) => StatusCode::BAD_REQUEST,
            ConfigError::Serde(_) | ConfigError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, e.to_string())
    }
}

/// `{"success": true}` merged with the fields of `data`. Non-object data
/// goes under `"data"`.
pub fn success<T: Serialize>(data: T) -> Result<Json<Value>, ApiError> {
    let value = serde_json::to_value(data)
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let body = match value {
        Value::Object(mut fields) => {
            fields.insert("success".into(), Value::Bool(true));
            Value::Object(fields)
        }
        Value::Null => json!({"success": true}),
        other => json!({"success": true, "data": other}),
    };
    Ok(Json(body))
}

pub type ActionResult = Result<Json<Value>, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shapes() {
        let Json(body) = success(json!({"id": "t1"})).unwrap();
        assert_eq!(body, json!({"success": true, "id": "t1"}));

        let Json(body) = success(vec![1, 2]).unwrap();
        assert_eq!(body, json!({"success": true, "data": [1, 2]}));

        let Json(body) = success(()).unwrap();
        assert_eq!(body, json!({"success": true}));
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(ApiError::from(AssetError::NotAuthenticated).status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::from(TemplateError::Database("down".into())).status,
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(AiError::Validation("bad".into())).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ConfigError::Invalid("x".into())).message,
            "Invalid configuration: x"
        );
    }
}
