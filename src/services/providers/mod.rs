// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! AI text-generation vendors and tier-based routing.
//!
//! Each vendor is a [`GenerativeProvider`] built only when its API key is
//! configured. [`ProviderRouter`] picks a vendor per request: an explicit
//! `llm_provider` in the request pins one, otherwise the subscription tier's
//! preference order decides and the first configured vendor wins.

pub mod anthropic;
pub mod gemini;
pub mod openai;

use crate::config::Config;
use crate::error::AppError;
use crate::models::SubscriptionTier;
use async_trait::async_trait;
use std::sync::Arc;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

const GENERATION_TEMPERATURE: f64 = 0.7;
const GENERATION_MAX_TOKENS: u32 = 1000;

/// Supported text-generation vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    OpenAi,
    Anthropic,
    Google,
}

impl Vendor {
    /// Parse the wire name used in request bodies and health output.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "anthropic" => Some(Self::Anthropic),
            "gemini" | "google" => Some(Self::Google),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "gemini",
        }
    }
}

/// Errors from vendor API calls.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response shape: {0}")]
    Shape(String),
}

/// One configured text-generation vendor.
#[async_trait]
pub trait GenerativeProvider: Send + Sync + std::fmt::Debug {
    fn vendor(&self) -> Vendor;

    /// Model served to a given subscription tier.
    fn model_for(&self, tier: SubscriptionTier) -> &'static str;

    async fn generate(
        &self,
        prompt: &str,
        tier: SubscriptionTier,
    ) -> Result<String, ProviderError>;
}

/// Vendor preference per tier. First configured entry wins.
fn preference_order(tier: SubscriptionTier) -> [Vendor; 3] {
    match tier {
        SubscriptionTier::Pro | SubscriptionTier::Founders => {
            [Vendor::Anthropic, Vendor::OpenAi, Vendor::Google]
        }
        SubscriptionTier::Premium => [Vendor::OpenAi, Vendor::Anthropic, Vendor::Google],
        SubscriptionTier::Free => [Vendor::Google, Vendor::OpenAi, Vendor::Anthropic],
    }
}

/// Routes generation requests to the configured vendors.
#[derive(Clone, Default)]
pub struct ProviderRouter {
    providers: Vec<Arc<dyn GenerativeProvider>>,
}

impl ProviderRouter {
    /// Build providers for every configured API key.
    pub fn from_config(config: &Config) -> Self {
        let mut providers: Vec<Arc<dyn GenerativeProvider>> = Vec::new();

        if let Some(key) = &config.openai_api_key {
            providers.push(Arc::new(OpenAiProvider::new(key.clone())));
        }
        if let Some(key) = &config.anthropic_api_key {
            providers.push(Arc::new(AnthropicProvider::new(key.clone())));
        }
        if let Some(key) = &config.google_ai_api_key {
            providers.push(Arc::new(GeminiProvider::new(key.clone())));
        }

        Self { providers }
    }

    /// Build from explicit providers (tests use this with fakes).
    pub fn with_providers(providers: Vec<Arc<dyn GenerativeProvider>>) -> Self {
        Self { providers }
    }

    /// Vendors currently configured, in construction order.
    pub fn available(&self) -> Vec<Vendor> {
        self.providers.iter().map(|p| p.vendor()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    fn find(&self, vendor: Vendor) -> Option<Arc<dyn GenerativeProvider>> {
        self.providers
            .iter()
            .find(|p| p.vendor() == vendor)
            .cloned()
    }

    /// Pick the vendor for one request.
    ///
    /// A pinned vendor must be configured; there is no silent fallback to a
    /// different vendor than the caller asked for.
    pub fn select(
        &self,
        tier: SubscriptionTier,
        pinned: Option<Vendor>,
    ) -> Result<Arc<dyn GenerativeProvider>, AppError> {
        if let Some(vendor) = pinned {
            return self.find(vendor).ok_or_else(|| {
                tracing::warn!(
                    vendor = vendor.as_str(),
                    "Requested AI vendor is not configured"
                );
                AppError::NoProviderAvailable
            });
        }

        for vendor in preference_order(tier) {
            if let Some(provider) = self.find(vendor) {
                return Ok(provider);
            }
        }

        Err(AppError::NoProviderAvailable)
    }

    /// Generate text via the selected vendor.
    pub async fn generate(
        &self,
        prompt: &str,
        tier: SubscriptionTier,
        pinned: Option<Vendor>,
    ) -> Result<String, AppError> {
        let provider = self.select(tier, pinned)?;

        tracing::debug!(
            vendor = provider.vendor().as_str(),
            model = provider.model_for(tier),
            tier = tier.as_str(),
            prompt_chars = prompt.len(),
            "Dispatching generation request"
        );

        provider.generate(prompt, tier).await.map_err(|e| {
            AppError::Provider(format!("{} generation failed: {e}", provider.vendor().as_str()))
        })
    }
}

/// Read a non-success vendor response into an API error.
pub(crate) async fn api_error(response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    ProviderError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct FakeProvider(Vendor);

    #[async_trait]
    impl GenerativeProvider for FakeProvider {
        fn vendor(&self) -> Vendor {
            self.0
        }

        fn model_for(&self, _tier: SubscriptionTier) -> &'static str {
            "fake-model"
        }

        async fn generate(
            &self,
            _prompt: &str,
            _tier: SubscriptionTier,
        ) -> Result<String, ProviderError> {
            Ok(format!("reply from {}", self.0.as_str()))
        }
    }

    fn router(vendors: &[Vendor]) -> ProviderRouter {
        ProviderRouter::with_providers(
            vendors
                .iter()
                .map(|v| Arc::new(FakeProvider(*v)) as Arc<dyn GenerativeProvider>)
                .collect(),
        )
    }

    #[test]
    fn test_vendor_names() {
        assert_eq!(Vendor::from_name("openai"), Some(Vendor::OpenAi));
        assert_eq!(Vendor::from_name("Anthropic"), Some(Vendor::Anthropic));
        assert_eq!(Vendor::from_name("gemini"), Some(Vendor::Google));
        assert_eq!(Vendor::from_name("google"), Some(Vendor::Google));
        assert_eq!(Vendor::from_name("mistral"), None);
    }

    #[test]
    fn test_select_prefers_anthropic_for_pro() {
        let all = router(&[Vendor::OpenAi, Vendor::Anthropic, Vendor::Google]);

        let picked = all.select(SubscriptionTier::Pro, None).unwrap();
        assert_eq!(picked.vendor(), Vendor::Anthropic);

        let picked = all.select(SubscriptionTier::Founders, None).unwrap();
        assert_eq!(picked.vendor(), Vendor::Anthropic);
    }

    #[test]
    fn test_select_prefers_openai_for_premium() {
        let all = router(&[Vendor::OpenAi, Vendor::Anthropic, Vendor::Google]);
        let picked = all.select(SubscriptionTier::Premium, None).unwrap();
        assert_eq!(picked.vendor(), Vendor::OpenAi);
    }

    #[test]
    fn test_select_prefers_google_for_free() {
        let all = router(&[Vendor::OpenAi, Vendor::Anthropic, Vendor::Google]);
        let picked = all.select(SubscriptionTier::Free, None).unwrap();
        assert_eq!(picked.vendor(), Vendor::Google);
    }

    #[test]
    fn test_select_falls_back_when_preferred_missing() {
        // Pro prefers Anthropic; only OpenAI configured.
        let openai_only = router(&[Vendor::OpenAi]);
        let picked = openai_only.select(SubscriptionTier::Pro, None).unwrap();
        assert_eq!(picked.vendor(), Vendor::OpenAi);

        // Free prefers Google; only Anthropic configured.
        let anthropic_only = router(&[Vendor::Anthropic]);
        let picked = anthropic_only.select(SubscriptionTier::Free, None).unwrap();
        assert_eq!(picked.vendor(), Vendor::Anthropic);
    }

    #[test]
    fn test_pinned_vendor_must_be_configured() {
        let openai_only = router(&[Vendor::OpenAi]);

        let picked = openai_only
            .select(SubscriptionTier::Free, Some(Vendor::OpenAi))
            .unwrap();
        assert_eq!(picked.vendor(), Vendor::OpenAi);

        // Pinned-but-missing never falls back to a different vendor.
        let err = openai_only
            .select(SubscriptionTier::Pro, Some(Vendor::Anthropic))
            .unwrap_err();
        assert!(matches!(err, AppError::NoProviderAvailable));
    }

    #[test]
    fn test_empty_router_has_no_provider() {
        let none = router(&[]);
        let err = none.select(SubscriptionTier::Free, None).unwrap_err();
        assert!(matches!(err, AppError::NoProviderAvailable));
    }

    #[tokio::test]
    async fn test_generate_uses_selected_vendor() {
        let all = router(&[Vendor::OpenAi, Vendor::Anthropic, Vendor::Google]);
        let reply = all
            .generate("hello", SubscriptionTier::Premium, None)
            .await
            .unwrap();
        assert_eq!(reply, "reply from openai");
    }
}
