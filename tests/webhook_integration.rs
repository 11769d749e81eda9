// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Integration tests for Stripe webhook handling.
//!
//! Nothing in a webhook body is trusted until the signature over the raw
//! bytes verifies. After that the endpoint always acknowledges, because
//! Stripe retries on any non-2xx.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use grimoire_api::config::Config;
use grimoire_api::routes::create_router;
use grimoire_api::services::stripe::sign_payload;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

mod common;

const WEBHOOK_SECRET: &str = "whsec_test_secret";

fn create_webhook_app() -> axum::Router {
    let config = Config {
        stripe_webhook_secret: Some(WEBHOOK_SECRET.to_string()),
        ..common::unified_config()
    };
    create_router(Arc::new(common::unified_state(config)))
}

fn webhook_request(body: &str, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/webhook/stripe")
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header("Stripe-Signature", signature);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn sign_now(body: &str) -> String {
    sign_payload(body.as_bytes(), WEBHOOK_SECRET, chrono::Utc::now().timestamp())
}

#[tokio::test]
async fn test_webhook_without_configured_secret() {
    // No signing secret in config: every delivery is refused.
    let app = common::create_unified_app();

    let body = json!({"type": "checkout.session.completed", "data": {"object": {}}}).to_string();
    let response = app
        .oneshot(webhook_request(&body, Some(&sign_now(&body))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_webhook_missing_signature_header() {
    let app = create_webhook_app();

    let body = json!({"type": "checkout.session.completed", "data": {"object": {}}}).to_string();
    let response = app.oneshot(webhook_request(&body, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = common::read_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "unauthorized");
}

#[tokio::test]
async fn test_webhook_rejects_wrong_secret() {
    let app = create_webhook_app();

    let body = json!({"type": "checkout.session.completed", "data": {"object": {}}}).to_string();
    let forged = sign_payload(
        body.as_bytes(),
        "whsec_someone_elses_secret",
        chrono::Utc::now().timestamp(),
    );

    let response = app
        .oneshot(webhook_request(&body, Some(&forged)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_webhook_rejects_tampered_body() {
    let app = create_webhook_app();

    let signed_body =
        json!({"type": "checkout.session.completed", "data": {"object": {}}}).to_string();
    let signature = sign_now(&signed_body);

    let tampered =
        json!({"type": "checkout.session.completed", "data": {"object": {"customer": "cus_x"}}})
            .to_string();

    let response = app
        .oneshot(webhook_request(&tampered, Some(&signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_webhook_rejects_stale_timestamp() {
    let app = create_webhook_app();

    let body = json!({"type": "checkout.session.completed", "data": {"object": {}}}).to_string();
    // Valid HMAC, but signed well outside the accepted timestamp window.
    let stale = sign_payload(
        body.as_bytes(),
        WEBHOOK_SECRET,
        chrono::Utc::now().timestamp() - 4000,
    );

    let response = app
        .oneshot(webhook_request(&body, Some(&stale)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_webhook_acknowledges_unhandled_event_type() {
    let app = create_webhook_app();

    let body = json!({"type": "invoice.paid", "data": {"object": {}}}).to_string();
    let response = app
        .oneshot(webhook_request(&body, Some(&sign_now(&body))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = common::read_json(response).await;
    assert_eq!(json["received"], true);
}

#[tokio::test]
async fn test_webhook_acknowledges_unparseable_signed_body() {
    let app = create_webhook_app();

    // Signed, so it really came from Stripe; ack it even though the envelope
    // does not parse, otherwise Stripe retries forever.
    let body = "not json at all";
    let response = app
        .oneshot(webhook_request(body, Some(&sign_now(body))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = common::read_json(response).await;
    assert_eq!(json["received"], true);
}

#[tokio::test]
async fn test_webhook_acknowledges_when_store_is_down() {
    let app = create_webhook_app();

    let body = json!({
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "customer": "cus_test_1",
                "metadata": {"user_id": common::TEST_UID, "tier": "premium"}
            }
        }
    })
    .to_string();

    let response = app
        .oneshot(webhook_request(&body, Some(&sign_now(&body))))
        .await
        .unwrap();

    // The offline store fails the upgrade internally; the delivery is still
    // acknowledged and the failure lands in the logs.
    assert_eq!(response.status(), StatusCode::OK);

    let json = common::read_json(response).await;
    assert_eq!(json["received"], true);
}

#[tokio::test]
async fn test_webhook_acknowledges_unknown_metadata_tier() {
    let app = create_webhook_app();

    let body = json!({
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "metadata": {"user_id": common::TEST_UID, "tier": "platinum"}
            }
        }
    })
    .to_string();

    let response = app
        .oneshot(webhook_request(&body, Some(&sign_now(&body))))
        .await
        .unwrap();

    // An unrecognizable tier is never guessed at; the event is logged and
    // acknowledged without touching any profile.
    assert_eq!(response.status(), StatusCode::OK);

    let json = common::read_json(response).await;
    assert_eq!(json["received"], true);
}
