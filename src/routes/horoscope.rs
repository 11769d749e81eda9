// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Daily horoscope route.

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{UsageKind, ZodiacSign};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/horoscope/{sign}", get(daily_horoscope))
}

#[derive(Serialize)]
pub struct HoroscopeResponse {
    pub success: bool,
    /// Horoscope payload from the external source, the AI fallback, or the
    /// built-in placeholder; shape varies by source
    pub horoscope: serde_json::Value,
    pub personalized_for: String,
    pub compatible_crystals: Vec<String>,
}

/// Daily horoscope for one sign, personalized with the caller's name.
async fn daily_horoscope(
    State(state): State<Arc<AppState>>,
    Path(sign): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<HoroscopeResponse>> {
    let sign = ZodiacSign::from_name(&sign)
        .ok_or_else(|| AppError::BadRequest("Invalid zodiac sign".to_string()))?;

    let profile = state
        .db
        .ensure_profile(&user.uid, user.email.clone(), user.name.clone())
        .await?;

    let horoscope = state.horoscope.daily(sign, &state.providers).await;

    if let Err(e) = state
        .db
        .increment_usage(&user.uid, UsageKind::Horoscope)
        .await
    {
        tracing::warn!(error = %e, user_id = %user.uid, "Usage increment failed");
    }

    Ok(Json(HoroscopeResponse {
        success: true,
        horoscope,
        personalized_for: profile.name,
        compatible_crystals: state.catalog.compatible_with(sign),
    }))
}
