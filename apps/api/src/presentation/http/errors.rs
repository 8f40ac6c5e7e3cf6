//! HTTP error handling and response conversion.
//!
//! Handler errors map to a status code and a `{ "error": <message> }` body.
//! Messages shown to the caller never include backend detail; that detail is
//! kept on the error for logging only.

use crate::domain::image::errors::ImageError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Application-level errors returned from handlers.
#[derive(Debug)]
pub enum AppError {
    /// No session cookie (401).
    Unauthorized(String),

    /// Caller-supplied input is invalid (400).
    BadRequest(String),

    /// Storage backend failed (500). `message` is shown, `detail` is only logged.
    Storage { message: String, detail: String },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Storage { detail, .. } => write!(f, "Storage error: {}", detail),
        }
    }
}

impl AppError {
    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-safe error message (without implementation details).
    fn user_message(&self) -> String {
        match self {
            Self::Unauthorized(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::Storage { message, .. } => message.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.user_message();

        match status {
            StatusCode::INTERNAL_SERVER_ERROR => tracing::error!("error={}", self),
            StatusCode::BAD_REQUEST => tracing::warn!("error={}", self),
            _ => tracing::info!("error={}", self),
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

// === Pipeline Error Conversion ===

impl From<ImageError> for AppError {
    fn from(err: ImageError) -> Self {
        let message = err.to_string();
        match err {
            ImageError::Unauthorized => AppError::Unauthorized(message),
            ImageError::UploadFailed(source) | ImageError::DeleteFailed(source) => {
                AppError::Storage {
                    message,
                    detail: format!("{:#}", source),
                }
            }
            ImageError::MissingFile
            | ImageError::UnsupportedType(_)
            | ImageError::TooLarge(_)
            | ImageError::MissingUrl => AppError::BadRequest(message),
        }
    }
}
