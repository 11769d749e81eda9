// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Data models for the application.

pub mod collection;
pub mod crystal;
pub mod user;
pub mod zodiac;

pub use collection::{CrystalDetails, SavedCrystalEntry, ENTRY_SCHEMA_VERSION};
pub use crystal::CrystalFact;
pub use user::{SubscriptionTier, UsageDay, UsageKind, UserProfile};
pub use zodiac::ZodiacSign;
