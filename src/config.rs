// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Application configuration loaded from environment variables.
//!
//! Every external credential is optional: an absent key simply means the
//! matching capability is reported as unavailable. Only the Firebase project
//! id is required, and only when running in unified mode.

use std::env;

use crate::models::SubscriptionTier;

/// Which surface the process serves.
///
/// `Demo` answers everything from canned tables with no auth and no outbound
/// calls; `Unified` is the real service backed by Firebase, Firestore, Stripe,
/// and the generative-text vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Demo,
    Unified,
}

impl AppMode {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "demo" => Some(Self::Demo),
            "unified" => Some(Self::Unified),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Demo => "demo",
            Self::Unified => "unified",
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Operating mode (demo or unified)
    pub mode: AppMode,
    /// Server port
    pub port: u16,
    /// Firebase project id (Firestore project, token issuer/audience)
    pub firebase_project_id: String,
    /// Public base URL used to build checkout redirect URLs
    pub api_base_url: String,
    /// Allowed CORS origins; `["*"]` means any origin
    pub allowed_origins: Vec<String>,

    // --- Payment provider ---
    /// Stripe API secret key
    pub stripe_secret_key: Option<String>,
    /// Stripe webhook signing secret
    pub stripe_webhook_secret: Option<String>,
    /// Stripe price id for the premium tier
    pub stripe_premium_price_id: Option<String>,
    /// Stripe price id for the pro tier
    pub stripe_pro_price_id: Option<String>,
    /// Stripe price id for the founders tier
    pub stripe_founders_price_id: Option<String>,

    // --- Generative-text vendors ---
    /// OpenAI API key
    pub openai_api_key: Option<String>,
    /// Anthropic API key
    pub anthropic_api_key: Option<String>,
    /// Google AI (Gemini) API key
    pub google_ai_api_key: Option<String>,

    // --- Horoscope source ---
    /// External horoscope API base URL
    pub horoscope_api_url: Option<String>,
    /// External horoscope API key
    pub horoscope_api_key: Option<String>,
    /// External horoscope API host header value
    pub horoscope_api_host: Option<String>,

    // --- Usage policy ---
    /// Daily identification allowance for the free tier
    pub free_tier_daily_limit: u32,
    /// Daily identification allowance for the premium tier
    pub premium_tier_daily_limit: u32,
    /// Daily identification allowance for the pro tier
    pub pro_tier_daily_limit: u32,
    /// Daily identification allowance for the founders tier
    pub founders_tier_daily_limit: u32,
    /// Reject over-limit actions instead of only metering them
    pub enforce_usage_limits: bool,
    /// Maximum decoded size for an attached image payload
    pub max_image_bytes: usize,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            mode: AppMode::Demo,
            port: 8084,
            firebase_project_id: "test-project".to_string(),
            api_base_url: "http://localhost:8084".to_string(),
            allowed_origins: vec!["*".to_string()],
            stripe_secret_key: None,
            stripe_webhook_secret: None,
            stripe_premium_price_id: None,
            stripe_pro_price_id: None,
            stripe_founders_price_id: None,
            openai_api_key: None,
            anthropic_api_key: None,
            google_ai_api_key: None,
            horoscope_api_url: None,
            horoscope_api_key: None,
            horoscope_api_host: None,
            free_tier_daily_limit: 5,
            premium_tier_daily_limit: 30,
            pro_tier_daily_limit: 999,
            founders_tier_daily_limit: 9999,
            enforce_usage_limits: false,
            max_image_bytes: 4 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let mode = match env::var("APP_MODE") {
            Ok(value) => AppMode::parse(&value).ok_or(ConfigError::Invalid("APP_MODE"))?,
            Err(_) => AppMode::Demo,
        };

        let firebase_project_id = match env::var("FIREBASE_PROJECT_ID") {
            Ok(value) => value.trim().to_string(),
            // Demo mode never talks to Firebase, so a placeholder is fine.
            Err(_) if mode == AppMode::Demo => "demo-local".to_string(),
            Err(_) => return Err(ConfigError::Missing("FIREBASE_PROJECT_ID")),
        };

        Ok(Self {
            mode,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8084".to_string())
                .parse()
                .unwrap_or(8084),
            firebase_project_id,
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8084".to_string()),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            stripe_secret_key: optional_var("STRIPE_SECRET_KEY"),
            stripe_webhook_secret: optional_var("STRIPE_WEBHOOK_SECRET"),
            stripe_premium_price_id: optional_var("STRIPE_PREMIUM_PRICE_ID"),
            stripe_pro_price_id: optional_var("STRIPE_PRO_PRICE_ID"),
            stripe_founders_price_id: optional_var("STRIPE_FOUNDERS_PRICE_ID"),
            openai_api_key: optional_var("OPENAI_API_KEY"),
            anthropic_api_key: optional_var("ANTHROPIC_API_KEY"),
            google_ai_api_key: optional_var("GOOGLE_AI_API_KEY"),
            horoscope_api_url: optional_var("HOROSCOPE_API_URL"),
            horoscope_api_key: optional_var("HOROSCOPE_API_KEY"),
            horoscope_api_host: optional_var("HOROSCOPE_API_HOST"),
            free_tier_daily_limit: limit_var("FREE_TIER_DAILY_IDENTIFICATIONS", 5),
            premium_tier_daily_limit: limit_var("PREMIUM_TIER_DAILY_IDENTIFICATIONS", 30),
            pro_tier_daily_limit: limit_var("PRO_TIER_DAILY_IDENTIFICATIONS", 999),
            founders_tier_daily_limit: limit_var("FOUNDERS_TIER_DAILY_IDENTIFICATIONS", 9999),
            enforce_usage_limits: env::var("ENFORCE_USAGE_LIMITS")
                .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            max_image_bytes: env::var("MAX_IMAGE_BYTES")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(4 * 1024 * 1024),
        })
    }

    /// Daily identification allowance for a subscription tier.
    pub fn daily_limit(&self, tier: SubscriptionTier) -> u32 {
        match tier {
            SubscriptionTier::Free => self.free_tier_daily_limit,
            SubscriptionTier::Premium => self.premium_tier_daily_limit,
            SubscriptionTier::Pro => self.pro_tier_daily_limit,
            SubscriptionTier::Founders => self.founders_tier_daily_limit,
        }
    }

    /// Stripe price id configured for a tier, if any. The free tier is never
    /// purchasable.
    pub fn price_id_for(&self, tier: SubscriptionTier) -> Option<&str> {
        match tier {
            SubscriptionTier::Free => None,
            SubscriptionTier::Premium => self.stripe_premium_price_id.as_deref(),
            SubscriptionTier::Pro => self.stripe_pro_price_id.as_deref(),
            SubscriptionTier::Founders => self.stripe_founders_price_id.as_deref(),
        }
    }
}

/// Read an optional env var, treating empty/whitespace values as unset.
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn limit_var(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
