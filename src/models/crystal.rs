// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Crystal reference entry model.

use serde::{Deserialize, Serialize};

/// One static reference entry in the crystal database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrystalFact {
    /// Display name (e.g. "Amethyst")
    pub name: String,
    /// Mineral family
    #[serde(rename = "type")]
    pub mineral_type: String,
    /// Primary color
    pub color: String,
    /// Associated energy center
    pub chakra: String,
    /// Metaphysical property labels
    pub properties: Vec<String>,
    /// Compatible zodiac signs, title-cased; may contain "All signs"
    pub zodiac_compatibility: Vec<String>,
    /// Free-text description
    pub description: String,
}

impl CrystalFact {
    /// Whether a title-cased sign name is in this entry's compatibility list.
    pub fn is_compatible_with(&self, sign_title: &str) -> bool {
        self.zodiac_compatibility
            .iter()
            .any(|s| s == sign_title || s == "All signs")
    }
}
