// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! HTTP route handlers.

pub mod billing;
pub mod crystal;
pub mod demo;
pub mod guidance;
pub mod horoscope;
pub mod profile;
pub mod webhook;

use crate::config::AppMode;
use crate::middleware::auth::require_auth;
use crate::services::Vendor;
use crate::AppState;
use axum::extract::State;
use axum::http::{header, Method};
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// API contract version reported by the health endpoint.
const API_VERSION: &str = "2.0.0";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub mode: &'static str,
    /// One flag per dependency; reflects configuration only, no liveness
    /// probes are made
    pub services: BTreeMap<&'static str, bool>,
}

/// Health check response with per-dependency capability flags.
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let services = match state.config.mode {
        AppMode::Demo => BTreeMap::from([
            ("crystal_ai", true),
            ("horoscope", true),
            ("guidance", true),
            ("payment", true),
        ]),
        AppMode::Unified => {
            let vendors = state.providers.available();
            BTreeMap::from([
                ("firebase", state.db.is_connected()),
                ("openai", vendors.contains(&Vendor::OpenAi)),
                ("anthropic", vendors.contains(&Vendor::Anthropic)),
                ("google", vendors.contains(&Vendor::Google)),
                ("stripe", state.config.stripe_secret_key.is_some()),
                ("horoscope", state.horoscope.is_configured()),
            ])
        }
    };

    Json(HealthResponse {
        status: "healthy",
        version: API_VERSION,
        mode: state.config.mode.as_str(),
        services,
    })
}

/// Build the complete router for the configured mode.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS - allow configured origins plus localhost (for dev); "*" in the
    // configured list allows any origin.
    let allowed_origins = state.config.allowed_origins.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                allowed_origins
                    .iter()
                    .any(|allowed| allowed == "*" || allowed == origin_str)
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    let routes = match state.config.mode {
        AppMode::Demo => Router::new()
            .route("/health", get(health_check))
            .merge(demo::routes()),
        AppMode::Unified => {
            // Public routes (no auth required); the webhook is gated by its
            // signature rather than a bearer token.
            let public_routes = Router::new()
                .route("/health", get(health_check))
                .route("/api/crystals/database", get(crystal::crystal_database))
                .merge(webhook::routes());

            // Protected routes (auth required)
            let protected_routes = crystal::routes()
                .merge(guidance::routes())
                .merge(horoscope::routes())
                .merge(profile::routes())
                .merge(billing::routes())
                .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

            public_routes.merge(protected_routes)
        }
    };

    routes
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
