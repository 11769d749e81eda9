// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Subscription checkout route.

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::SubscriptionTier;
use crate::AppState;
use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/subscription/checkout", post(create_checkout))
}

/// Checkout request body, shared with the demo surface.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub tier: String,
}

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub success: bool,
    pub checkout_url: String,
    pub session_id: String,
}

/// Create a hosted checkout session for a paid tier.
///
/// Tier validation happens before the gateway is touched: an unknown or
/// unpriced tier is the caller's mistake, an unconfigured gateway is ours.
async fn create_checkout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    let tier = SubscriptionTier::from_name(&payload.tier)
        .ok_or_else(|| AppError::BadRequest("Invalid subscription tier".to_string()))?;

    let price_id = state
        .config
        .price_id_for(tier)
        .ok_or_else(|| AppError::BadRequest("Invalid subscription tier".to_string()))?
        .to_string();

    let gateway = state.checkout.as_ref().ok_or_else(|| {
        AppError::Provider("Checkout requested but no payment secret is configured".to_string())
    })?;

    let session = gateway.create_session(&user.uid, tier, &price_id).await?;

    Ok(Json(CheckoutResponse {
        success: true,
        checkout_url: session.url,
        session_id: session.id,
    }))
}
