//! Error handling for alertsrv
//!
//! `AlertError` covers the service layer; `ApiError` is what handlers return
//! and renders as `{"error": "<message>"}`.

use alert_kv::KvError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, AlertError>;

#[derive(Error, Debug)]
pub enum AlertError {
    /// Backend command failed; message passed through unchanged
    #[error(transparent)]
    Storage(#[from] KvError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No backend configured
    #[error("Backend not configured")]
    BackendUnavailable,

    #[error("Invalid field pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<figment::Error> for AlertError {
    fn from(err: figment::Error) -> Self {
        AlertError::Config(err.to_string())
    }
}

/// HTTP error response
#[derive(Debug, Clone, PartialEq, Eq)]
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

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
