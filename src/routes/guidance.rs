// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Personalized guidance route.

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{SubscriptionTier, UsageKind};
use crate::services::prompts;
use crate::AppState;
use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/guidance/personalized", post(personalized_guidance))
}

/// Guidance request body, shared with the demo surface.
#[derive(Debug, Deserialize, Validate)]
pub struct GuidanceRequest {
    #[validate(length(min = 1, max = 1000, message = "must be 1 to 1000 characters"))]
    pub query: String,
    #[serde(default = "default_guidance_type")]
    pub guidance_type: String,
    #[serde(default)]
    pub user_context: HashMap<String, serde_json::Value>,
}

fn default_guidance_type() -> String {
    "general".to_string()
}

/// Profile context echoed back so the client can show what the advice was
/// based on.
#[derive(Serialize)]
pub struct GuidanceContext {
    pub user_name: String,
    pub birth_date: Option<String>,
    pub zodiac_info: serde_json::Value,
    pub owned_crystals: Vec<String>,
    pub recent_mood: &'static str,
    pub subscription_tier: SubscriptionTier,
}

#[derive(Serialize)]
pub struct GuidanceResponse {
    pub success: bool,
    pub guidance: String,
    pub context_used: GuidanceContext,
}

/// Generate personalized guidance from the caller's profile and query.
async fn personalized_guidance(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<GuidanceRequest>,
) -> Result<Json<GuidanceResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let profile = state
        .db
        .ensure_profile(&user.uid, user.email.clone(), user.name.clone())
        .await?;

    let context = GuidanceContext {
        user_name: profile.name.clone(),
        birth_date: profile.birth_date.clone(),
        zodiac_info: profile
            .spiritual_preferences
            .get("zodiac_info")
            .cloned()
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new())),
        owned_crystals: Vec::new(),
        recent_mood: "neutral",
        subscription_tier: profile.subscription_tier,
    };

    let prompt = prompts::guidance_prompt(&profile, &payload.query, &payload.guidance_type);
    let guidance = state
        .providers
        .generate(&prompt, profile.subscription_tier, None)
        .await?;

    if let Err(e) = state
        .db
        .increment_usage(&user.uid, UsageKind::Guidance)
        .await
    {
        tracing::warn!(error = %e, user_id = %user.uid, "Usage increment failed");
    }

    Ok(Json(GuidanceResponse {
        success: true,
        guidance,
        context_used: context,
    }))
}
