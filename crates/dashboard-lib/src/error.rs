//! Error types for the dashboard
//!
//! - [`ConfigError`]: fatal, raised while loading configuration at startup
//! - [`ApiError`]: request-time failure, rendered as the generic JSON error
//!
//! Terminal command rejections live in [`crate::gate::RejectionReason`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("node name pool is empty")]
    EmptyNodePool,

    #[error("pod name pool is empty")]
    EmptyPodPool,

    #[error("invalid CORS origin: {0}")]
    InvalidCorsOrigin(String),
}

/// Generic error body: `{"status": "error", "message": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

/// Failure inside a request handler
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new(self.to_string())),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let json = serde_json::to_value(ErrorBody::new("boom")).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "boom");
    }

    #[test]
    fn test_api_error_is_500() {
        let response = ApiError::internal("boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = ApiError::from(anyhow::anyhow!("wrapped")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(ConfigError::EmptyNodePool.to_string(), "node name pool is empty");
        assert_eq!(
            ConfigError::InvalidCorsOrigin("bad\n".to_string()).to_string(),
            "invalid CORS origin: bad\n"
        );
    }
}
