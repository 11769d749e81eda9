// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Anthropic Messages API vendor.

use super::{api_error, GenerativeProvider, ProviderError, Vendor};
use super::GENERATION_MAX_TOKENS;
use crate::models::SubscriptionTier;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug)]
pub struct AnthropicProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AnthropicProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://api.anthropic.com".to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl GenerativeProvider for AnthropicProvider {
    fn vendor(&self) -> Vendor {
        Vendor::Anthropic
    }

    fn model_for(&self, tier: SubscriptionTier) -> &'static str {
        match tier {
            SubscriptionTier::Founders => "claude-3-opus-20240229",
            _ => "claude-3-sonnet-20240229",
        }
    }

    async fn generate(
        &self,
        prompt: &str,
        tier: SubscriptionTier,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/v1/messages", self.base_url);

        let body = MessagesRequest {
            model: self.model_for(tier),
            messages: vec![UserMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: GENERATION_MAX_TOKENS,
        };

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let reply: MessagesResponse = response.json().await?;

        reply
            .content
            .into_iter()
            .next()
            .map(|block| block.text)
            .ok_or_else(|| ProviderError::Shape("message contained no content blocks".to_string()))
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    messages: Vec<UserMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_by_tier() {
        let provider = AnthropicProvider::new("sk-ant-test".to_string());
        assert_eq!(
            provider.model_for(SubscriptionTier::Free),
            "claude-3-sonnet-20240229"
        );
        assert_eq!(
            provider.model_for(SubscriptionTier::Pro),
            "claude-3-sonnet-20240229"
        );
        assert_eq!(
            provider.model_for(SubscriptionTier::Founders),
            "claude-3-opus-20240229"
        );
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{
            "id": "msg_1",
            "content": [{"type": "text", "text": "Rose Quartz."}],
            "model": "claude-3-sonnet-20240229"
        }"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.content[0].text, "Rose Quartz.");
    }
}
