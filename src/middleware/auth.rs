// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Bearer-token authentication middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authenticated caller identity, inserted as a request extension.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Middleware that requires a verified bearer token.
///
/// Only verifies identity; profile resolution happens in handlers that need
/// it, so a valid token never fails here on store trouble.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers())?;
    let verified = state.verifier.verify(token).await?;

    let auth_user = AuthUser {
        uid: verified.uid,
        email: verified.email,
        name: verified.name,
    };
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Pull the bearer token out of the Authorization header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .unwrap_or_default();

    if token.is_empty() {
        return Err(AppError::Unauthorized);
    }

    Ok(token)
}
