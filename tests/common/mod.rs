// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

use async_trait::async_trait;
use grimoire_api::config::{AppMode, Config};
use grimoire_api::db::FirestoreDb;
use grimoire_api::error::AppError;
use grimoire_api::models::SubscriptionTier;
use grimoire_api::routes::create_router;
use grimoire_api::services::providers::ProviderError;
use grimoire_api::services::{
    CheckoutGateway, CheckoutSession, CrystalCatalog, GenerativeProvider, HoroscopeService,
    ProviderRouter, TokenVerifier, Vendor, VerifiedUser, VerifyError,
};
use grimoire_api::AppState;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Bearer token the stub verifier accepts.
#[allow(dead_code)]
pub const VALID_TOKEN: &str = "test-firebase-id-token";

/// Uid behind [`VALID_TOKEN`].
#[allow(dead_code)]
pub const TEST_UID: &str = "user_test_1";

/// Token verifier stub mapping fixed tokens to identities. Anything not in
/// the map is rejected as invalid, so no test depends on real Firebase keys.
#[derive(Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, VerifiedUser>,
}

impl StaticTokenVerifier {
    /// Verifier accepting [`VALID_TOKEN`] for the standard test user.
    #[allow(dead_code)]
    pub fn standard() -> Self {
        let mut verifier = Self::default();
        verifier.add_user(
            VALID_TOKEN,
            VerifiedUser {
                uid: TEST_UID.to_string(),
                email: Some("seeker@example.com".to_string()),
                name: Some("Test Seeker".to_string()),
            },
        );
        verifier
    }

    #[allow(dead_code)]
    pub fn add_user(&mut self, token: &str, user: VerifiedUser) {
        self.tokens.insert(token.to_string(), user);
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedUser, VerifyError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| VerifyError::Invalid("unknown test token".to_string()))
    }
}

/// Generative provider stub answering every prompt with a fixed reply.
#[derive(Debug)]
pub struct CannedProvider {
    reply: String,
}

impl CannedProvider {
    #[allow(dead_code)]
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
        }
    }
}

#[async_trait]
impl GenerativeProvider for CannedProvider {
    fn vendor(&self) -> Vendor {
        Vendor::OpenAi
    }

    fn model_for(&self, _tier: SubscriptionTier) -> &'static str {
        "canned-model"
    }

    async fn generate(
        &self,
        _prompt: &str,
        _tier: SubscriptionTier,
    ) -> Result<String, ProviderError> {
        Ok(self.reply.clone())
    }
}

/// Checkout gateway stub that counts calls instead of talking to Stripe.
#[derive(Default)]
pub struct RecordingGateway {
    pub calls: AtomicUsize,
}

impl RecordingGateway {
    #[allow(dead_code)]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CheckoutGateway for RecordingGateway {
    async fn create_session(
        &self,
        user_id: &str,
        tier: SubscriptionTier,
        price_id: &str,
    ) -> Result<CheckoutSession, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(CheckoutSession {
            id: format!("cs_test_{}", tier.as_str()),
            url: format!("https://checkout.test/{user_id}/{price_id}"),
        })
    }
}

/// Unified-mode state with stubbed seams and an offline database.
#[allow(dead_code)]
pub fn unified_state(config: Config) -> AppState {
    AppState {
        config,
        db: FirestoreDb::new_mock(),
        catalog: CrystalCatalog::new(),
        verifier: Arc::new(StaticTokenVerifier::standard()),
        providers: ProviderRouter::with_providers(vec![Arc::new(CannedProvider::new(
            "Name: Amethyst\nColor: Purple",
        ))]),
        horoscope: HoroscopeService::default(),
        checkout: None,
    }
}

/// Config for unified-mode tests.
#[allow(dead_code)]
pub fn unified_config() -> Config {
    Config {
        mode: AppMode::Unified,
        ..Config::default()
    }
}

/// App serving the demo surface.
#[allow(dead_code)]
pub fn create_demo_app() -> axum::Router {
    let state = AppState {
        config: Config::default(),
        db: FirestoreDb::new_mock(),
        catalog: CrystalCatalog::new(),
        verifier: Arc::new(StaticTokenVerifier::default()),
        providers: ProviderRouter::default(),
        horoscope: HoroscopeService::default(),
        checkout: None,
    };
    create_router(Arc::new(state))
}

/// App serving the unified surface with the standard stub seams.
#[allow(dead_code)]
pub fn create_unified_app() -> axum::Router {
    create_router(Arc::new(unified_state(unified_config())))
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&body).expect("Response body is not JSON")
}
