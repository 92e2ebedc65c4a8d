// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
///
/// The relay variants (`Configuration`, `BadRequest`, `GoogleApi`) map to
/// HTTP status codes; the companion-core variants (`Storage`,
/// `InvalidTimeFormat`) never travel over HTTP in practice but keep the
/// mapping total.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Relay is not configured: {0}")]
    Configuration(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Google API error: {0}")]
    GoogleApi(String),

    #[error("Quote API error: {0}")]
    QuoteApi(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Configuration(msg) => {
                tracing::error!(error = %msg, "Relay misconfigured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "configuration_error",
                    Some(msg.clone()),
                )
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::GoogleApi(msg) => {
                (StatusCode::BAD_GATEWAY, "google_error", Some(msg.clone()))
            }
            AppError::QuoteApi(msg) => {
                (StatusCode::BAD_GATEWAY, "quote_error", Some(msg.clone()))
            }
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
            }
            AppError::InvalidTimeFormat(msg) => (
                StatusCode::BAD_REQUEST,
                "invalid_time_format",
                Some(msg.clone()),
            ),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
