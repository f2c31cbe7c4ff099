//! Error types for Canopy
//!
//! Every failure surfaces to the caller as an HTTP status plus a JSON body of
//! the form `{"error": "<message>"}`. There are no structured error codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or rejected bearer token
    #[error("{0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Identity or data backend reported a failure
    #[error("{0}")]
    Backend(String),

    /// AI provider call failed. `status` is what the caller sees.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Upstream provider failure with an explicit status
    pub fn upstream(status: StatusCode, message: impl Into<String>) -> Self {
        AppError::Upstream {
            status,
            message: message.into(),
        }
    }

    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream { status, .. } => *status,
            AppError::HttpError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Unauthorized(msg) | AppError::BadRequest(msg) | AppError::Backend(msg) => {
                msg.clone()
            }
            AppError::Upstream { message, .. } => message.clone(),
            AppError::HttpError(e) => e.to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
