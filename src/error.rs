//! Application error types and result alias.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application result type alias
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or unusable credentials
    #[error("Unauthorized")]
    Unauthorized,

    /// Authenticated but not allowed
    #[error("{0}")]
    Forbidden(String),

    /// Not found error
    #[error("{0}")]
    NotFound(String),

    /// Conflict error (e.g., invalid lifecycle transition, duplicate application)
    #[error("{0}")]
    Conflict(String),

    /// Validation error
    #[error("{0}")]
    Validation(String),

    /// Upload exceeds the size cap
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Upload has an unsupported content type
    #[error("{0}")]
    UnsupportedMedia(String),

    /// Upstream (auth backend / proxy target) error
    #[error("Upstream error: {0}")]
    Upstream(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Address parse error
    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Errore di configurazione".to_string(),
            ),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Non autorizzato".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg.clone()),
            AppError::UnsupportedMedia(msg) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, msg.clone()),
            AppError::Upstream(_) => (
                StatusCode::BAD_GATEWAY,
                "Backend non raggiungibile".to_string(),
            ),
            AppError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Operazione su disco fallita".to_string(),
            ),
            AppError::AddrParse(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Indirizzo non valido".to_string(),
            ),
            AppError::Json(_) => (StatusCode::BAD_REQUEST, "Richiesta non valida".to_string()),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Errore interno".to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, status = %status, "Request error");
        }

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}
