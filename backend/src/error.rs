//! Error handling for the Solar Placement Scoring platform
//!
//! Only invalid input, configuration problems and the hard request
//! deadline ever surface to the caller; everything else degrades to
//! documented fallbacks inside the pipeline.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Input errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // External collaborators
    #[error("Summarizer unavailable: {0}")]
    SummarizerUnavailable(String),

    // Deadlines
    #[error("Request deadline exceeded")]
    DeadlineExceeded,

    // Configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Wire error body: `{ "error": "<short-code>", "detail": "<human string>" }`
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match &self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                "invalid_input",
                format!("{field}: {message}"),
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("{resource} not found"),
            ),
            AppError::SummarizerUnavailable(msg) => (
                StatusCode::BAD_GATEWAY,
                "summarizer_unavailable",
                msg.clone(),
            ),
            AppError::DeadlineExceeded => (
                StatusCode::GATEWAY_TIMEOUT,
                "deadline_exceeded",
                "The request exceeded the hard deadline".to_string(),
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "configuration_error",
                msg.clone(),
            ),
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                "A database error occurred".to_string(),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal server error occurred".to_string(),
            ),
        };

        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: code, detail })).into_response()
    }
}

impl From<shared::ValidationError> for AppError {
    fn from(err: shared::ValidationError) -> Self {
        AppError::Validation {
            field: err.field.to_string(),
            message: err.message.to_string(),
        }
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;
