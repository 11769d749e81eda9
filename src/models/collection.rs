// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Saved-crystal collection models.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Current storage schema version for saved entries.
pub const ENTRY_SCHEMA_VERSION: u32 = 1;

/// Structured fields decoded from an identification response.
///
/// Decoding is best-effort; absent fields mean the upstream text did not
/// surface them, not that identification failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrystalDetails {
    /// Identified crystal name
    pub name: String,
    /// Variant or mineral family, when stated
    #[serde(default)]
    pub variant: Option<String>,
    /// Color, when stated
    #[serde(default)]
    pub color: Option<String>,
    /// Associated energy center, when stated
    #[serde(default)]
    pub chakra: Option<String>,
    /// Free-text description line, when stated
    #[serde(default)]
    pub description: Option<String>,
    /// Metaphysical property lines
    #[serde(default)]
    pub properties: Vec<String>,
    /// Suggested-use lines
    #[serde(default)]
    pub suggested_uses: Vec<String>,
}

/// One saved identification in a user's collection.
///
/// Document id is `{user_id}_{entry_id}` (entry id percent-encoded); saves
/// are upserts, so a repeated id is last-write-wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedCrystalEntry {
    /// Entry id, unique within the user's collection
    pub id: String,
    /// Owning user id
    pub user_id: String,
    /// Display name
    pub name: String,
    /// Variant or mineral family
    #[serde(default)]
    pub variant: Option<String>,
    /// Color
    #[serde(default)]
    pub color: Option<String>,
    /// Short description shown in the collection view
    #[serde(default)]
    pub description: Option<String>,
    /// Structured identification payload, when decoding succeeded
    #[serde(default)]
    pub crystal: Option<CrystalDetails>,
    /// Raw upstream identification text, always preserved
    #[serde(default)]
    pub raw_response: String,
    /// Context the caller supplied at identification time
    #[serde(default)]
    pub user_context: HashMap<String, serde_json::Value>,
    /// Free-form user notes
    #[serde(default)]
    pub notes: Option<String>,
    /// When the entry was saved (RFC 3339)
    pub saved_at: String,
    /// Which surface wrote the entry
    pub source: String,
    /// Storage schema version
    pub schema_version: u32,
}
