//! Custom error types and handling
//!
//! This module defines the application's error types and implements
//! conversion to HTTP responses for the Axum framework.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Eligibility errors
    #[error("Contest is not accepting submissions")]
    ContestNotActive,

    // Resource errors
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Question not found in contest")]
    QuestionNotFound,

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // Backpressure: the submission queue is at capacity, retryable
    #[error("Judging queue is at capacity, retry later")]
    Overloaded,

    // Infrastructure-level failure to start or drive a sandbox run,
    // distinct from a judged RuntimeError verdict
    #[error("Sandbox failure: {0}")]
    Sandbox(String),

    // Submission lifecycle violation (e.g. re-claiming a claimed submission)
    #[error("Invalid submission state transition: {0}")]
    InvalidTransition(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

/// Error details in response
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

impl AppError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::ContestNotActive => "CONTEST_NOT_ACTIVE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::QuestionNotFound => "QUESTION_NOT_FOUND",
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::Conflict(_) => "CONFLICT",
            Self::Overloaded => "OVERLOADED",
            Self::Sandbox(_) => "SANDBOX_FAILURE",
            Self::InvalidTransition(_) => "INVALID_TRANSITION",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::ContestNotActive => StatusCode::CONFLICT,
            Self::NotFound(_) | Self::QuestionNotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists(_) | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Overloaded => StatusCode::SERVICE_UNAVAILABLE,
            Self::InvalidTransition(_) => StatusCode::CONFLICT,
            Self::Sandbox(_) | Self::Internal(_) | Self::Configuration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log internal errors but don't expose details to clients
        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                "An internal error occurred".to_string()
            }
            AppError::Sandbox(e) => {
                tracing::error!("Sandbox failure: {}", e);
                "Judging infrastructure is temporarily unavailable".to_string()
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            error: ErrorDetails {
                code: self.error_code().to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<bollard::errors::Error> for AppError {
    fn from(err: bollard::errors::Error) -> Self {
        AppError::Sandbox(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
