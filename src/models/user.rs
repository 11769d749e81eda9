// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! User profile and usage models for storage and API.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Subscription tiers, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Premium,
    Pro,
    Founders,
}

impl SubscriptionTier {
    /// Parse a tier name. Unknown names are a validation error at the
    /// boundary, never coerced to a default.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "free" => Some(Self::Free),
            "premium" => Some(Self::Premium),
            "pro" => Some(Self::Pro),
            "founders" => Some(Self::Founders),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Premium => "premium",
            Self::Pro => "pro",
            Self::Founders => "founders",
        }
    }
}

/// User profile stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Verified identity subject (also used as document ID)
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address (may be empty if the identity token lacks one)
    pub email: String,
    /// Birth date (ISO 8601 date)
    #[serde(default)]
    pub birth_date: Option<String>,
    /// Birth time (free-form "HH:MM")
    #[serde(default)]
    pub birth_time: Option<String>,
    /// Birth location label
    #[serde(default)]
    pub birth_location: Option<String>,
    /// Birth latitude
    #[serde(default)]
    pub birth_latitude: Option<f64>,
    /// Birth longitude
    #[serde(default)]
    pub birth_longitude: Option<f64>,
    /// Subscription tier
    #[serde(default)]
    pub subscription_tier: SubscriptionTier,
    /// Stripe customer id, set after first checkout completes
    #[serde(default)]
    pub stripe_customer_id: Option<String>,
    /// Free-form spiritual preferences (zodiac sign, favorite chakra, ...)
    #[serde(default)]
    pub spiritual_preferences: HashMap<String, serde_json::Value>,
    /// When the profile was created (RFC 3339)
    pub created_at: String,
    /// Last profile update (RFC 3339)
    pub updated_at: String,
}

impl UserProfile {
    /// Fresh profile for a first-time caller.
    pub fn new_default(id: String, email: Option<String>, name: Option<String>) -> Self {
        let now = crate::time_utils::now_rfc3339();
        Self {
            id,
            name: name.unwrap_or_else(|| "Crystal Seeker".to_string()),
            email: email.unwrap_or_default(),
            birth_date: None,
            birth_time: None,
            birth_location: None,
            birth_latitude: None,
            birth_longitude: None,
            subscription_tier: SubscriptionTier::Free,
            stripe_customer_id: None,
            spiritual_preferences: HashMap::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// The user's stated zodiac sign from preferences, if any.
    pub fn zodiac_preference(&self) -> Option<&str> {
        self.spiritual_preferences
            .get("zodiac_sign")
            .and_then(|v| v.as_str())
    }
}

/// Kinds of metered user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageKind {
    Identification,
    Guidance,
    Horoscope,
    CollectionSave,
}

impl UsageKind {
    /// Field name inside the daily usage document.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Identification => "identifications",
            Self::Guidance => "guidance_queries",
            Self::Horoscope => "horoscope_queries",
            Self::CollectionSave => "collection_saves",
        }
    }

    /// Human label for logs and limit errors.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Identification => "identification",
            Self::Guidance => "guidance",
            Self::Horoscope => "horoscope",
            Self::CollectionSave => "collection_save",
        }
    }
}

/// Per-user, per-UTC-day usage counters.
///
/// Document id is `{user_id}_{YYYY-MM-DD}`; counters are only ever mutated via
/// the store's atomic increment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageDay {
    #[serde(default)]
    pub identifications: u32,
    #[serde(default)]
    pub guidance_queries: u32,
    #[serde(default)]
    pub horoscope_queries: u32,
    #[serde(default)]
    pub collection_saves: u32,
    /// Last increment time (RFC 3339)
    #[serde(default)]
    pub last_updated: String,
}

impl UsageDay {
    pub fn count_for(&self, kind: UsageKind) -> u32 {
        match kind {
            UsageKind::Identification => self.identifications,
            UsageKind::Guidance => self.guidance_queries,
            UsageKind::Horoscope => self.horoscope_queries,
            UsageKind::CollectionSave => self.collection_saves,
        }
    }
}
