// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! End-to-end usage metering and enforcement tests.
//!
//! Metering always counts; ENFORCE_USAGE_LIMITS only controls whether the
//! count gates identification. These tests drive the real store, so they
//! need the emulator (FIRESTORE_EMULATOR_HOST) and skip without it.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use grimoire_api::config::Config;
use grimoire_api::routes::create_router;
use grimoire_api::services::{
    CrystalCatalog, HoroscopeService, ProviderRouter, TokenVerifier, VerifiedUser,
};
use grimoire_api::AppState;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

mod common;

use common::{CannedProvider, StaticTokenVerifier};

/// Unified app backed by the emulator, with a per-test user so runs stay
/// isolated. Returns the shared state for direct store assertions.
async fn create_metered_app(
    config: Config,
    token: &str,
    uid: &str,
) -> (axum::Router, Arc<AppState>) {
    let mut verifier = StaticTokenVerifier::default();
    verifier.add_user(
        token,
        VerifiedUser {
            uid: uid.to_string(),
            email: Some("metered@example.com".to_string()),
            name: Some("Metered User".to_string()),
        },
    );

    let state = Arc::new(AppState {
        config,
        db: common::test_db().await,
        catalog: CrystalCatalog::new(),
        verifier: Arc::new(verifier) as Arc<dyn TokenVerifier>,
        providers: ProviderRouter::with_providers(vec![Arc::new(CannedProvider::new(
            "Name: Amethyst\nColor: Purple\nChakra: Crown",
        ))]),
        horoscope: HoroscopeService::default(),
        checkout: None,
    });

    (create_router(state.clone()), state)
}

fn unique_uid(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}_{nanos}")
}

fn identify_request(token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/crystal/identify")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"description": "a deep purple cluster"}).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn test_enforced_limit_blocks_after_allowance() {
    require_emulator!();

    let uid = unique_uid("enforced");
    let config = Config {
        enforce_usage_limits: true,
        free_tier_daily_limit: 2,
        ..common::unified_config()
    };
    let (app, _state) = create_metered_app(config, "enforced-token", &uid).await;

    // First call: fresh counter, one use left afterwards.
    let response = app
        .clone()
        .oneshot(identify_request("enforced-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::read_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["identification"], "Name: Amethyst\nColor: Purple\nChakra: Crown");
    assert_eq!(body["crystal"]["name"], "Amethyst");
    assert_eq!(body["usage_remaining"], 1);

    // Second call exhausts the allowance.
    let response = app
        .clone()
        .oneshot(identify_request("enforced-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::read_json(response).await;
    assert_eq!(body["usage_remaining"], 0);

    // Third call is over the limit.
    let response = app
        .oneshot(identify_request("enforced-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = common::read_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "usage_limit_reached");
    assert_eq!(body["details"], "Daily limit reached for identification");
}

#[tokio::test]
async fn test_metering_counts_without_enforcement() {
    require_emulator!();

    let uid = unique_uid("metered");
    let config = Config {
        enforce_usage_limits: false,
        free_tier_daily_limit: 1,
        ..common::unified_config()
    };
    let (app, state) = create_metered_app(config, "metered-token", &uid).await;

    // Both calls succeed even though the second is over the allowance.
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(identify_request("metered-token"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // The counter still recorded every use.
    let usage = state.db.get_usage_today(&uid).await.unwrap().unwrap();
    assert_eq!(usage.identifications, 2);
}

#[tokio::test]
async fn test_profile_reports_per_kind_counters() {
    require_emulator!();

    let uid = unique_uid("reporter");
    let (app, _state) = create_metered_app(common::unified_config(), "reporter-token", &uid).await;

    // One guidance query and one horoscope read.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/guidance/personalized")
                .header(header::AUTHORIZATION, "Bearer reporter-token")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"query": "what crystal should I carry?"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::read_json(response).await;
    assert_eq!(body["context_used"]["user_name"], "Metered User");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/horoscope/leo")
                .header(header::AUTHORIZATION, "Bearer reporter-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::read_json(response).await;
    assert_eq!(body["personalized_for"], "Metered User");

    // The profile endpoint reports both counters with the tier limit.
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/user/profile")
                .header(header::AUTHORIZATION, "Bearer reporter-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::read_json(response).await;
    assert_eq!(body["profile"]["name"], "Metered User");
    assert_eq!(body["daily_usage"]["guidance_queries"], 1);
    assert_eq!(body["daily_usage"]["horoscope_queries"], 1);
    assert_eq!(body["daily_usage"]["identifications"], 0);
    assert_eq!(body["daily_usage"]["limit"], 5);
}

#[tokio::test]
async fn test_save_and_list_collection_over_http() {
    require_emulator!();

    let uid = unique_uid("saver");
    let (app, _state) = create_metered_app(common::unified_config(), "saver-token", &uid).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/crystal/save")
                .header(header::AUTHORIZATION, "Bearer saver-token")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "crystal": {"name": "Amethyst", "color": "Purple"},
                        "raw_response": "Name: Amethyst\nColor: Purple",
                        "notes": "Birthday gift"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::read_json(response).await;
    assert_eq!(body["success"], true);
    let entry_id = body["entry_id"].as_str().unwrap().to_string();
    assert!(!entry_id.is_empty());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/crystal/collection/{uid}"))
                .header(header::AUTHORIZATION, "Bearer saver-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::read_json(response).await;
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["crystals"][0]["id"], entry_id);
    // Name fell back to the structured payload; source to the default.
    assert_eq!(body["crystals"][0]["name"], "Amethyst");
    assert_eq!(body["crystals"][0]["source"], "user_save");
    assert_eq!(body["crystals"][0]["notes"], "Birthday gift");
}
