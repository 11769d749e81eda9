// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! User profile route.

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{UsageDay, UserProfile};
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/user/profile", get(get_profile))
}

#[derive(Serialize)]
pub struct DailyUsageReport {
    pub identifications: u32,
    pub guidance_queries: u32,
    pub horoscope_queries: u32,
    pub collection_saves: u32,
    /// Daily identification allowance for the caller's tier
    pub limit: u32,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub profile: UserProfile,
    pub daily_usage: DailyUsageReport,
}

/// The caller's profile plus today's usage counters. Creates a default
/// profile on first contact.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let profile = state
        .db
        .ensure_profile(&user.uid, user.email.clone(), user.name.clone())
        .await?;

    let usage = state
        .db
        .get_usage_today(&user.uid)
        .await?
        .unwrap_or_else(UsageDay::default);

    let daily_usage = DailyUsageReport {
        identifications: usage.identifications,
        guidance_queries: usage.guidance_queries,
        horoscope_queries: usage.horoscope_queries,
        collection_saves: usage.collection_saves,
        limit: state.config.daily_limit(profile.subscription_tier),
    };

    Ok(Json(ProfileResponse {
        success: true,
        profile,
        daily_usage,
    }))
}
