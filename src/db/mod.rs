// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Daily usage counters (keyed by `{user_id}_{YYYY-MM-DD}`)
    pub const USAGE: &str = "usage";
    /// Saved identifications (keyed by `{user_id}_{entry_id}`)
    pub const CRYSTAL_COLLECTION: &str = "crystal_collection";
}
