// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Google Gemini vendor.
//!
//! Serves every tier with the same flash model; the key rides in the query
//! string per the generativelanguage API convention.

use super::{api_error, GenerativeProvider, ProviderError, Vendor};
use super::{GENERATION_MAX_TOKENS, GENERATION_TEMPERATURE};
use crate::models::SubscriptionTier;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub struct GeminiProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl GenerativeProvider for GeminiProvider {
    fn vendor(&self) -> Vendor {
        Vendor::Google
    }

    fn model_for(&self, _tier: SubscriptionTier) -> &'static str {
        "gemini-1.5-flash"
    }

    async fn generate(
        &self,
        prompt: &str,
        tier: SubscriptionTier,
    ) -> Result<String, ProviderError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url,
            self.model_for(tier)
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![TextPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: GENERATION_TEMPERATURE,
                max_output_tokens: GENERATION_MAX_TOKENS,
            },
        };

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let reply: GenerateContentResponse = response.json().await?;

        reply
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| ProviderError::Shape("response contained no candidates".to_string()))
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_model_for_all_tiers() {
        let provider = GeminiProvider::new("AIza-test".to_string());
        for tier in [
            SubscriptionTier::Free,
            SubscriptionTier::Premium,
            SubscriptionTier::Pro,
            SubscriptionTier::Founders,
        ] {
            assert_eq!(provider.model_for(tier), "gemini-1.5-flash");
        }
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Clear Quartz."}], "role": "model"}}
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.candidates[0].content.parts[0].text, "Clear Quartz.");
    }

    #[test]
    fn test_empty_candidates_parse() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
