// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! OpenAI chat-completions vendor.

use super::{api_error, GenerativeProvider, ProviderError, Vendor};
use super::{GENERATION_MAX_TOKENS, GENERATION_TEMPERATURE};
use crate::models::SubscriptionTier;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub struct OpenAiProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl GenerativeProvider for OpenAiProvider {
    fn vendor(&self) -> Vendor {
        Vendor::OpenAi
    }

    fn model_for(&self, tier: SubscriptionTier) -> &'static str {
        match tier {
            SubscriptionTier::Pro | SubscriptionTier::Founders => "gpt-4-turbo-preview",
            _ => "gpt-3.5-turbo",
        }
    }

    async fn generate(
        &self,
        prompt: &str,
        tier: SubscriptionTier,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = ChatCompletionRequest {
            model: self.model_for(tier),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: GENERATION_TEMPERATURE,
            max_tokens: GENERATION_MAX_TOKENS,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let completion: ChatCompletionResponse = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::Shape("completion contained no choices".to_string()))
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    content: String,
}
