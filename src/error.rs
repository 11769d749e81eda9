// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Daily usage limit reached for {action}")]
    UsageLimitReached { action: &'static str },

    #[error("Identity provider unavailable: {0}")]
    IdentityUnavailable(String),

    #[error("No generative provider available")]
    NoProviderAvailable,

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::UsageLimitReached { action } => (
                StatusCode::TOO_MANY_REQUESTS,
                "usage_limit_reached",
                Some(format!("Daily limit reached for {action}")),
            ),
            AppError::IdentityUnavailable(msg) => {
                tracing::error!(error = %msg, "Identity provider unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "identity_unavailable",
                    None,
                )
            }
            AppError::NoProviderAvailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "no_provider_available",
                None,
            ),
            AppError::Provider(msg) => {
                // Raw vendor errors stay in the logs, never in responses.
                tracing::error!(error = %msg, "Provider error");
                (StatusCode::SERVICE_UNAVAILABLE, "provider_error", None)
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::SERVICE_UNAVAILABLE, "database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            success: false,
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
