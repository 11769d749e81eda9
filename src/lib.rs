// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Crystal Grimoire backend: crystal identification, guidance, horoscopes,
//! and subscriptions for the companion app.
//!
//! One binary serves two surfaces chosen by `APP_MODE`: a fully canned demo
//! and the real "unified" API backed by Firebase, Firestore, Stripe, and the
//! generative-text vendors.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use db::FirestoreDb;
use services::{CheckoutGateway, CrystalCatalog, HoroscopeService, ProviderRouter, TokenVerifier};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub catalog: CrystalCatalog,
    pub verifier: Arc<dyn TokenVerifier>,
    pub providers: ProviderRouter,
    pub horoscope: HoroscopeService,
    /// Present only when a payment secret is configured
    pub checkout: Option<Arc<dyn CheckoutGateway>>,
}
