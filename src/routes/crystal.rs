// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Crystal identification, reference database, and saved-collection routes.

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{
    CrystalDetails, CrystalFact, SavedCrystalEntry, UsageKind, ENTRY_SCHEMA_VERSION,
};
use crate::services::catalog::CatalogCategories;
use crate::services::{prompts, reading};
use crate::time_utils;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

/// Authenticated crystal routes; the bearer-token middleware is applied in
/// routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/crystal/identify", post(identify_crystal))
        .route("/api/crystal/save", post(save_crystal))
        .route("/api/crystal/collection/{user_id}", get(list_collection))
}

// ─── Identification ──────────────────────────────────────────

/// Identification request body, shared with the demo surface.
#[derive(Debug, Deserialize, Validate)]
pub struct IdentifyRequest {
    /// Base64-encoded photo; only its presence is forwarded upstream
    #[serde(default)]
    pub image_base64: Option<String>,
    #[validate(length(min = 1, max = 2000, message = "must be 1 to 2000 characters"))]
    pub description: String,
    #[serde(default)]
    pub user_context: HashMap<String, serde_json::Value>,
}

#[derive(Serialize)]
pub struct IdentifyResponse {
    pub success: bool,
    /// Raw upstream text, always preserved even when decoding succeeds
    pub identification: String,
    /// Best-effort structured decode of the text; null when nothing decoded
    pub crystal: Option<CrystalDetails>,
    pub usage_remaining: u32,
}

/// Identify a crystal from a description (and optional photo) via the
/// generative vendors.
async fn identify_crystal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<IdentifyRequest>,
) -> Result<Json<IdentifyResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let has_image = validate_image(payload.image_base64.as_deref(), state.config.max_image_bytes)?;

    let profile = state
        .db
        .ensure_profile(&user.uid, user.email.clone(), user.name.clone())
        .await?;
    let tier = profile.subscription_tier;
    let daily_limit = state.config.daily_limit(tier);

    // Today's count feeds both the limit gate and the remaining-usage field.
    // An unreadable counter never blocks the request.
    let used_today = match state.db.get_usage_today(&user.uid).await {
        Ok(day) => Some(
            day.map(|d| d.count_for(UsageKind::Identification))
                .unwrap_or(0),
        ),
        Err(e) => {
            tracing::warn!(error = %e, user_id = %user.uid, "Usage counter read failed");
            None
        }
    };

    if state.config.enforce_usage_limits {
        if let Some(used) = used_today {
            if used >= daily_limit {
                tracing::info!(
                    user_id = %user.uid,
                    tier = tier.as_str(),
                    used,
                    daily_limit,
                    "Daily identification limit reached"
                );
                return Err(AppError::UsageLimitReached {
                    action: "identification",
                });
            }
        }
    }

    let prompt = prompts::identify_prompt(&profile, &payload.description, has_image);
    let raw = state.providers.generate(&prompt, tier, None).await?;
    let crystal = reading::decode_reading(&raw);

    if let Err(e) = state
        .db
        .increment_usage(&user.uid, UsageKind::Identification)
        .await
    {
        tracing::warn!(error = %e, user_id = %user.uid, "Usage increment failed");
    }

    let usage_remaining = match used_today {
        Some(used) => daily_limit.saturating_sub(used + 1),
        None => daily_limit,
    };

    Ok(Json(IdentifyResponse {
        success: true,
        identification: raw,
        crystal,
        usage_remaining,
    }))
}

/// Check an attached image payload and report whether one is present.
///
/// An empty string counts as no image, matching how clients omit the field.
fn validate_image(encoded: Option<&str>, max_bytes: usize) -> Result<bool> {
    match encoded {
        Some(encoded) if !encoded.is_empty() => {
            let bytes = STANDARD.decode(encoded).map_err(|_| {
                AppError::BadRequest("Image payload is not valid base64".to_string())
            })?;
            if bytes.len() > max_bytes {
                return Err(AppError::BadRequest(
                    "Image payload exceeds the size limit".to_string(),
                ));
            }
            Ok(true)
        }
        _ => Ok(false),
    }
}

// ─── Reference Database ──────────────────────────────────────

#[derive(Serialize)]
pub struct CrystalDatabaseResponse {
    pub success: bool,
    pub crystals: Vec<CrystalFact>,
    pub total_count: usize,
    pub categories: CatalogCategories,
}

/// Static reference dump; unauthenticated in both modes.
pub async fn crystal_database(State(state): State<Arc<AppState>>) -> Json<CrystalDatabaseResponse> {
    let crystals = state.catalog.facts().to_vec();
    Json(CrystalDatabaseResponse {
        success: true,
        total_count: crystals.len(),
        crystals,
        categories: state.catalog.categories(),
    })
}

// ─── Saved Collection ────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SaveCrystalRequest {
    /// Entry id; generated when absent. Repeated ids overwrite (upsert).
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Structured identification payload as returned by the identify endpoint
    #[serde(default)]
    pub crystal: Option<CrystalDetails>,
    #[serde(default)]
    pub raw_response: String,
    #[serde(default)]
    pub user_context: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Serialize)]
pub struct SaveCrystalResponse {
    pub success: bool,
    pub entry_id: String,
    pub saved_at: String,
}

/// Persist one identification result in the caller's collection.
async fn save_crystal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<SaveCrystalRequest>,
) -> Result<Json<SaveCrystalResponse>> {
    let id = payload
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let name = payload
        .name
        .filter(|name| !name.trim().is_empty())
        .or_else(|| {
            payload
                .crystal
                .as_ref()
                .map(|c| c.name.clone())
                .filter(|name| !name.is_empty())
        })
        .unwrap_or_else(|| "Unknown Crystal".to_string());

    let entry = SavedCrystalEntry {
        id,
        user_id: user.uid.clone(),
        name,
        variant: payload.variant,
        color: payload.color,
        description: payload.description,
        crystal: payload.crystal,
        raw_response: payload.raw_response,
        user_context: payload.user_context,
        notes: payload.notes,
        saved_at: time_utils::now_rfc3339(),
        source: payload.source.unwrap_or_else(|| "user_save".to_string()),
        schema_version: ENTRY_SCHEMA_VERSION,
    };

    state.db.save_entry(&entry).await?;
    tracing::info!(user_id = %user.uid, entry_id = %entry.id, "Saved crystal entry");

    if let Err(e) = state
        .db
        .increment_usage(&user.uid, UsageKind::CollectionSave)
        .await
    {
        tracing::warn!(error = %e, user_id = %user.uid, "Usage increment failed");
    }

    Ok(Json(SaveCrystalResponse {
        success: true,
        entry_id: entry.id,
        saved_at: entry.saved_at,
    }))
}

#[derive(Serialize)]
pub struct CollectionResponse {
    pub success: bool,
    pub crystals: Vec<SavedCrystalEntry>,
    pub total_count: usize,
}

/// List the caller's saved collection. The path user id must match the
/// verified caller; ownership is checked before any store access.
async fn list_collection(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<CollectionResponse>> {
    if user_id != user.uid {
        tracing::warn!(
            caller = %user.uid,
            target = %user_id,
            "Security Alert: collection access attempted for another user"
        );
        return Err(AppError::Forbidden(
            "You can only access your own collection".to_string(),
        ));
    }

    let crystals = state.db.list_collection(&user.uid).await?;
    Ok(Json(CollectionResponse {
        success: true,
        total_count: crystals.len(),
        crystals,
    }))
}
