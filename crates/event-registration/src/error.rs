//! Error types for the registration backend.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// A single problem found in a registration submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// API error types.
///
/// Every variant renders as a JSON envelope with a user-facing (German)
/// message. Internal detail carried by `Persistence` is logged, never returned.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid registration: {} violation(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    #[error("Invalid admin credentials")]
    InvalidCredentials,

    #[error("Missing or invalid authorization")]
    Unauthorized,

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl ApiError {
    /// Message shown to the client.
    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "Alle Pflichtfelder ausfüllen!",
            ApiError::InvalidCredentials => "Falscher Benutzername oder Passwort",
            ApiError::Unauthorized => "Nicht autorisiert",
            ApiError::Persistence(_) => "Fehler beim Speichern",
        }
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Persistence(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_ERROR")
            }
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldViolation>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if let ApiError::Persistence(detail) = &self {
            error!(%detail, "Request failed with persistence error");
        }

        let body = ErrorResponse {
            error: self.public_message().to_string(),
            code: code.to_string(),
            details: match self {
                ApiError::Validation(violations) => Some(violations),
                _ => None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Persistence(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Persistence(format!("JSON serialization error: {}", e))
    }
}
