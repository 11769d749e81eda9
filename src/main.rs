// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Crystal Grimoire API Server
//!
//! Serves crystal identification, personalized guidance, horoscopes, and
//! subscription checkout for the companion app, in either demo or unified
//! mode.

use grimoire_api::{
    config::{AppMode, Config},
    db::FirestoreDb,
    services::{
        CheckoutGateway, CrystalCatalog, FirebaseTokenVerifier, HoroscopeService, ProviderRouter,
        StripeGateway,
    },
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(
        mode = config.mode.as_str(),
        port = config.port,
        "Starting Crystal Grimoire API"
    );

    let catalog = CrystalCatalog::new();
    tracing::info!(entries = catalog.facts().len(), "Crystal reference data loaded");

    let verifier = Arc::new(
        FirebaseTokenVerifier::new(&config.firebase_project_id)
            .expect("Failed to initialize token verifier"),
    );

    let state = match config.mode {
        AppMode::Demo => {
            tracing::info!("Demo mode: canned responses, no external dependencies");
            AppState {
                config: config.clone(),
                db: FirestoreDb::new_mock(),
                catalog,
                verifier,
                providers: ProviderRouter::default(),
                horoscope: HoroscopeService::default(),
                checkout: None,
            }
        }
        AppMode::Unified => {
            // Connect to Firestore
            let db = FirestoreDb::new(&config.firebase_project_id)
                .await
                .expect("Failed to connect to Firestore");

            let providers = ProviderRouter::from_config(&config);
            let vendors: Vec<&str> = providers.available().iter().map(|v| v.as_str()).collect();
            tracing::info!(vendors = ?vendors, "Generative vendors configured");

            let horoscope = HoroscopeService::from_config(&config);

            let checkout = config.stripe_secret_key.clone().map(|key| {
                Arc::new(StripeGateway::new(key, config.api_base_url.clone()))
                    as Arc<dyn CheckoutGateway>
            });

            tracing::info!(
                stripe = checkout.is_some(),
                webhook_secret = config.stripe_webhook_secret.is_some(),
                horoscope = horoscope.is_configured(),
                enforce_usage_limits = config.enforce_usage_limits,
                "External integrations"
            );

            AppState {
                config: config.clone(),
                db,
                catalog,
                verifier,
                providers,
                horoscope,
                checkout,
            }
        }
    };

    // Build router
    let app = grimoire_api::routes::create_router(Arc::new(state));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("grimoire_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
