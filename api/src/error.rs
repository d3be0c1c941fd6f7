//! Unified error types for the FluxRank API
//!
//! This module defines error types for each layer:
//! - `SourceError`: upstream fetch failures (GitHub, npm, Reddit)
//! - `DomainError`: storage and business logic errors
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure of a single upstream fetch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("Not found upstream: {0}")]
    NotFound(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Transient upstream error: {0}")]
    Transient(String),

    #[error("Fatal upstream error: {0}")]
    Fatal(String),
}

impl SourceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SourceError::NotFound(_) => ErrorKind::NotFound,
            SourceError::RateLimited(_) => ErrorKind::RateLimited,
            SourceError::Transient(_) => ErrorKind::TransientError,
            SourceError::Fatal(_) => ErrorKind::FatalError,
        }
    }

    /// Throttling and transient failures get one more attempt; the rest are final.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SourceError::RateLimited(_) | SourceError::Transient(_))
    }

    pub fn message(&self) -> &str {
        match self {
            SourceError::NotFound(m)
            | SourceError::RateLimited(m)
            | SourceError::Transient(m)
            | SourceError::Fatal(m) => m,
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() || e.is_connect() || e.is_request() {
            SourceError::Transient(e.to_string())
        } else if e.is_decode() {
            SourceError::Fatal(format!("Malformed response: {}", e))
        } else if let Some(status) = e.status() {
            if status.is_server_error() {
                SourceError::Transient(e.to_string())
            } else {
                SourceError::Fatal(e.to_string())
            }
        } else {
            SourceError::Fatal(e.to_string())
        }
    }
}

/// Error classification reported per entity in batch results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    RateLimited,
    TransientError,
    FatalError,
    StorageError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not_found"),
            ErrorKind::RateLimited => write!(f, "rate_limited"),
            ErrorKind::TransientError => write!(f, "transient_error"),
            ErrorKind::FatalError => write!(f, "fatal_error"),
            ErrorKind::StorageError => write!(f, "storage_error"),
        }
    }
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
    ok: bool,
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
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error", None)
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
            ok: false,
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}
