// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Stripe checkout sessions and webhook signature verification.
//!
//! Checkout goes through the hosted-session API with form-encoded params.
//! Webhook payloads are only trusted after their `Stripe-Signature` header
//! verifies: HMAC-SHA256 over `"{timestamp}.{raw body}"`, hex-encoded,
//! compared in constant time, with a bounded timestamp age.

use crate::error::AppError;
use crate::models::SubscriptionTier;
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Accepted age for a webhook timestamp, either direction.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// A created checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Seam for creating checkout sessions so tests can count calls instead of
/// hitting the payment provider.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    async fn create_session(
        &self,
        user_id: &str,
        tier: SubscriptionTier,
        price_id: &str,
    ) -> Result<CheckoutSession, AppError>;
}

/// Production gateway talking to the Stripe REST API.
pub struct StripeGateway {
    http: reqwest::Client,
    base_url: String,
    secret_key: String,
    api_base_url: String,
}

impl StripeGateway {
    pub fn new(secret_key: String, api_base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://api.stripe.com".to_string(),
            secret_key,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CheckoutGateway for StripeGateway {
    async fn create_session(
        &self,
        user_id: &str,
        tier: SubscriptionTier,
        price_id: &str,
    ) -> Result<CheckoutSession, AppError> {
        let url = format!("{}/v1/checkout/sessions", self.base_url);

        // {CHECKOUT_SESSION_ID} is substituted by Stripe on redirect.
        let success_url = format!(
            "{}/subscription/success?session_id={{CHECKOUT_SESSION_ID}}",
            self.api_base_url
        );
        let cancel_url = format!("{}/subscription/cancel", self.api_base_url);

        let params = [
            ("payment_method_types[0]", "card".to_string()),
            ("line_items[0][price]", price_id.to_string()),
            ("line_items[0][quantity]", "1".to_string()),
            ("mode", "subscription".to_string()),
            ("success_url", success_url),
            ("cancel_url", cancel_url),
            ("metadata[user_id]", user_id.to_string()),
            ("metadata[tier]", tier.as_str().to_string()),
        ];

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Stripe checkout request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "Stripe rejected checkout session: HTTP {status}: {body}"
            )));
        }

        let session: StripeCheckoutResponse = response.json().await.map_err(|e| {
            AppError::Provider(format!("Stripe checkout response parse failed: {e}"))
        })?;

        tracing::info!(
            user_id,
            tier = tier.as_str(),
            session_id = %session.id,
            "Created checkout session"
        );

        Ok(CheckoutSession {
            id: session.id,
            url: session.url,
        })
    }
}

#[derive(Debug, Deserialize)]
struct StripeCheckoutResponse {
    id: String,
    url: String,
}

// ─── Webhook Signature Verification ──────────────────────────

/// Webhook signature rejection reasons.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature header has no timestamp")]
    MissingTimestamp,

    #[error("signature header has no v1 signature")]
    MissingSignature,

    #[error("signature timestamp outside tolerance")]
    Stale,

    #[error("signature mismatch")]
    Mismatch,
}

/// Verify a `Stripe-Signature` header against the raw request body.
///
/// Header format is `t=<unix seconds>,v1=<hex hmac>[,v1=...]`; any matching
/// `v1` accepts. `now` is passed in so tests control the clock.
pub fn verify_webhook_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
) -> Result<(), SignatureError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse().ok(),
            "v1" => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::MissingTimestamp)?;

    if signatures.is_empty() {
        return Err(SignatureError::MissingSignature);
    }

    if (now - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(SignatureError::Stale);
    }

    let expected = compute_signature(payload, secret, timestamp);

    for candidate in signatures {
        if bool::from(candidate.as_bytes().ct_eq(expected.as_bytes())) {
            return Ok(());
        }
    }

    Err(SignatureError::Mismatch)
}

/// Build a valid signature header for a payload. Test fixtures and local
/// tooling use this to produce what Stripe would send.
pub fn sign_payload(payload: &[u8], secret: &str, timestamp: i64) -> String {
    format!(
        "t={},v1={}",
        timestamp,
        compute_signature(payload, secret, timestamp)
    )
}

fn compute_signature(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

// ─── Webhook Events ──────────────────────────────────────────

/// Deserialized webhook envelope. `object` stays loosely typed; each event
/// kind picks out the fields it needs.
#[derive(Debug, Deserialize)]
pub struct StripeEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}
