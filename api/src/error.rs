//! Unified error types for the Classbook API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core scheduling and ledger errors
//! - `NotificationError`: Outbound notification channel errors
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The requested slot is already held by an active enrollment
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The action was already performed (attendance marked, payment decided)
    #[error("Duplicate action: {0}")]
    DuplicateAction(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Notification channel errors
///
/// These never roll back a committed transition; callers log them.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Channel rejected notification: {status} - {message}")]
    Rejected { status: u16, message: String },

    #[error("Failed to encode notification: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Invalid signing secret")]
    InvalidSecret,
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Domain(DomainError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "Not found", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Validation(msg)) => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                Some(msg.clone()),
            ),
            AppError::Domain(DomainError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "Conflict", Some(msg.clone()))
            }
            AppError::Domain(DomainError::DuplicateAction(msg)) => {
                (StatusCode::CONFLICT, "Duplicate action", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Domain(DomainError::Internal(msg)) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone()))
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

impl AppError {
    /// True if this error is a slot conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Domain(DomainError::Conflict(_)))
    }

    /// True if this error is a repeated action
    pub fn is_duplicate(&self) -> bool {
        matches!(self, AppError::Domain(DomainError::DuplicateAction(_)))
    }

    /// True if this error is a validation failure
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Domain(DomainError::Validation(_)))
    }

    /// True if this error is a missing reference
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Domain(DomainError::NotFound(_)))
    }
}
