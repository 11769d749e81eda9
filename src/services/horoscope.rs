// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Daily horoscope lookup with layered fallbacks.
//!
//! Tries the external horoscope API when credentials are configured, then an
//! AI-generated horoscope, then a fixed placeholder. Every layer returns a
//! JSON object so the endpoint never fails outright on upstream trouble.

use crate::config::Config;
use crate::models::ZodiacSign;
use crate::services::providers::ProviderRouter;
use crate::time_utils::today_key;
use serde_json::{json, Value};

/// Horoscope source chain. Cheap to clone, holds no connection state.
#[derive(Clone, Default)]
pub struct HoroscopeService {
    http: reqwest::Client,
    api_url: Option<String>,
    api_key: Option<String>,
    api_host: Option<String>,
}

impl HoroscopeService {
    pub fn from_config(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.horoscope_api_url.clone(),
            api_key: config.horoscope_api_key.clone(),
            api_host: config.horoscope_api_host.clone(),
        }
    }

    /// Whether the external horoscope API is configured.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch today's horoscope for a sign.
    pub async fn daily(&self, sign: ZodiacSign, providers: &ProviderRouter) -> Value {
        if let (Some(url), Some(key)) = (&self.api_url, &self.api_key) {
            match self.fetch_external(url, key, sign).await {
                Ok(data) => return data,
                Err(e) => {
                    tracing::warn!(
                        sign = sign.name(),
                        error = %e,
                        "Horoscope API failed, falling back to AI"
                    );
                }
            }
        }

        self.generate_ai_horoscope(sign, providers).await
    }

    async fn fetch_external(
        &self,
        api_url: &str,
        api_key: &str,
        sign: ZodiacSign,
    ) -> Result<Value, reqwest::Error> {
        let url = format!("{}/daily", api_url.trim_end_matches('/'));

        let mut request = self
            .http
            .get(&url)
            .query(&[("sign", sign.name())])
            .header("X-RapidAPI-Key", api_key);

        if let Some(host) = &self.api_host {
            request = request.header("X-RapidAPI-Host", host);
        }

        let response = request.send().await?.error_for_status()?;
        response.json().await
    }

    async fn generate_ai_horoscope(&self, sign: ZodiacSign, providers: &ProviderRouter) -> Value {
        let prompt = crate::services::prompts::horoscope_prompt(sign);

        match providers
            .generate(&prompt, crate::models::SubscriptionTier::Free, None)
            .await
        {
            Ok(reply) => match serde_json::from_str::<Value>(reply.trim()) {
                Ok(data) if data.is_object() => data,
                _ => {
                    tracing::debug!(sign = sign.name(), "AI horoscope was not valid JSON");
                    placeholder_horoscope(sign)
                }
            },
            Err(e) => {
                tracing::debug!(sign = sign.name(), error = %e, "AI horoscope unavailable");
                placeholder_horoscope(sign)
            }
        }
    }
}

/// Last-resort horoscope when no upstream source works.
pub fn placeholder_horoscope(sign: ZodiacSign) -> Value {
    json!({
        "sign": sign.name(),
        "date": today_key(),
        "horoscope": format!(
            "Today brings new opportunities for {}. Trust your intuition.",
            sign.name()
        ),
        "lucky_crystal": "Clear Quartz",
        "lucky_numbers": [7, 14, 21],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_shape() {
        let data = placeholder_horoscope(ZodiacSign::Leo);
        assert_eq!(data["sign"], "leo");
        assert_eq!(data["lucky_crystal"], "Clear Quartz");
        assert_eq!(data["lucky_numbers"], json!([7, 14, 21]));
        assert!(data["horoscope"]
            .as_str()
            .unwrap()
            .contains("new opportunities for leo"));
    }

    #[tokio::test]
    async fn test_unconfigured_service_uses_placeholder() {
        // No API credentials, no AI vendors: the chain lands on the
        // placeholder without any network traffic.
        let service = HoroscopeService::default();
        let providers = ProviderRouter::default();

        let data = service.daily(ZodiacSign::Virgo, &providers).await;
        assert_eq!(data["sign"], "virgo");
        assert_eq!(data["lucky_crystal"], "Clear Quartz");
    }
}
