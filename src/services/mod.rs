// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Services module - business logic layer.

pub mod catalog;
pub mod firebase_auth;
pub mod horoscope;
pub mod prompts;
pub mod providers;
pub mod reading;
pub mod stripe;

pub use catalog::CrystalCatalog;
pub use firebase_auth::{FirebaseTokenVerifier, TokenVerifier, VerifiedUser, VerifyError};
pub use horoscope::HoroscopeService;
pub use providers::{GenerativeProvider, ProviderRouter, Vendor};
pub use stripe::{CheckoutGateway, CheckoutSession, StripeGateway};
