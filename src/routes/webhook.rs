// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Stripe webhook receiver.
//!
//! The signature is verified against the raw body before anything in the
//! payload is trusted. After that, event application is best-effort: Stripe
//! retries on non-2xx, so a failed database write is logged and the event is
//! acknowledged anyway.

use crate::error::{AppError, Result};
use crate::models::SubscriptionTier;
use crate::services::stripe::{self, StripeEvent};
use crate::AppState;
use axum::{body::Bytes, extract::State, http::HeaderMap, routing::post, Json, Router};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/webhook/stripe", post(handle_stripe_event))
}

#[derive(Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// Handle an incoming Stripe event (POST).
async fn handle_stripe_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>> {
    let secret = state.config.stripe_webhook_secret.as_deref().ok_or_else(|| {
        tracing::error!("Stripe webhook received but no signing secret is configured");
        AppError::Unauthorized
    })?;

    let signature = headers
        .get("Stripe-Signature")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Security Alert: Stripe webhook without signature header");
            AppError::Unauthorized
        })?;

    let now = chrono::Utc::now().timestamp();
    if let Err(e) = stripe::verify_webhook_signature(&body, signature, secret, now) {
        tracing::warn!(error = %e, "Security Alert: Stripe webhook signature rejected");
        return Err(AppError::Unauthorized);
    }

    let event: StripeEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            // Signed but unparseable; ack so Stripe stops resending it.
            tracing::error!(error = %e, "Failed to parse Stripe event envelope");
            return Ok(Json(WebhookAck { received: true }));
        }
    };

    tracing::info!(event_type = %event.event_type, "Stripe webhook event verified");

    match event.event_type.as_str() {
        "checkout.session.completed" => apply_checkout_completed(&state, &event.data.object).await,
        "customer.subscription.deleted" => {
            apply_subscription_deleted(&state, &event.data.object).await
        }
        other => {
            tracing::debug!(event_type = other, "Ignoring unhandled Stripe event type");
        }
    }

    Ok(Json(WebhookAck { received: true }))
}

/// Apply the purchased tier and customer id to the profile named in the
/// session metadata.
async fn apply_checkout_completed(state: &AppState, object: &Value) {
    let Some(user_id) = object.pointer("/metadata/user_id").and_then(Value::as_str) else {
        tracing::warn!("checkout.session.completed without user metadata");
        return;
    };

    let Some(tier) = object
        .pointer("/metadata/tier")
        .and_then(Value::as_str)
        .and_then(SubscriptionTier::from_name)
    else {
        tracing::warn!(user_id, "checkout.session.completed without a recognizable tier");
        return;
    };

    let customer = object
        .get("customer")
        .and_then(Value::as_str)
        .map(str::to_string);

    match state.db.apply_subscription(user_id, tier, customer).await {
        Ok(()) => {
            tracing::info!(user_id, tier = tier.as_str(), "Subscription activated");
        }
        Err(e) => {
            tracing::error!(error = %e, user_id, "Failed to apply subscription upgrade");
        }
    }
}

/// Revert the owning profile to the free tier when a subscription ends.
/// The event only carries the Stripe customer id, so the profile is found by
/// lookup.
async fn apply_subscription_deleted(state: &AppState, object: &Value) {
    let Some(customer) = object.get("customer").and_then(Value::as_str) else {
        tracing::warn!("customer.subscription.deleted without customer id");
        return;
    };

    match state.db.find_user_by_stripe_customer(customer).await {
        Ok(Some(profile)) => {
            match state
                .db
                .apply_subscription(&profile.id, SubscriptionTier::Free, None)
                .await
            {
                Ok(()) => {
                    tracing::info!(user_id = %profile.id, "Subscription reverted to free");
                }
                Err(e) => {
                    tracing::error!(error = %e, user_id = %profile.id, "Failed to revert subscription");
                }
            }
        }
        Ok(None) => {
            tracing::warn!(customer, "No profile holds the deleted subscription's customer");
        }
        Err(e) => {
            tracing::error!(error = %e, customer, "Customer lookup failed for subscription deletion");
        }
    }
}
