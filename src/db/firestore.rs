// SPDX-License-Identifier: MIT
// Copyright 2026 Crystal Grimoire Developers

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile storage, create-on-first-auth)
//! - Usage (atomic per-day counters)
//! - Crystal collection (saved identifications)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{SavedCrystalEntry, UsageDay, UsageKind, UserProfile};
use crate::time_utils;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing
        // a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Whether a live connection is held (false for the mock/offline handle).
    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get a user profile by id.
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user profile.
    pub async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&profile.id)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Fetch the caller's profile, creating a default one on first contact.
    pub async fn ensure_profile(
        &self,
        user_id: &str,
        email: Option<String>,
        name: Option<String>,
    ) -> Result<UserProfile, AppError> {
        if let Some(profile) = self.get_profile(user_id).await? {
            return Ok(profile);
        }

        let profile = UserProfile::new_default(user_id.to_string(), email, name);
        self.upsert_profile(&profile).await?;
        tracing::info!(user_id, "Created profile for first-time user");
        Ok(profile)
    }

    /// Apply a subscription change to a profile (used by the payment webhook).
    ///
    /// Creates the profile if the user has never called an endpoint that
    /// materializes one.
    pub async fn apply_subscription(
        &self,
        user_id: &str,
        tier: crate::models::SubscriptionTier,
        stripe_customer_id: Option<String>,
    ) -> Result<(), AppError> {
        let mut profile = match self.get_profile(user_id).await? {
            Some(profile) => profile,
            None => UserProfile::new_default(user_id.to_string(), None, None),
        };

        profile.subscription_tier = tier;
        if stripe_customer_id.is_some() {
            profile.stripe_customer_id = stripe_customer_id;
        }
        profile.updated_at = time_utils::now_rfc3339();

        self.upsert_profile(&profile).await
    }

    /// Look up the profile holding a Stripe customer id, if any.
    ///
    /// Subscription-lifecycle webhook events only carry the customer id, not
    /// our user id.
    pub async fn find_user_by_stripe_customer(
        &self,
        customer_id: &str,
    ) -> Result<Option<UserProfile>, AppError> {
        let customer_id = customer_id.to_string();
        let matches: Vec<UserProfile> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| {
                q.for_all([q.field("stripe_customer_id").eq(customer_id.clone())])
            })
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(matches.into_iter().next())
    }

    // ─── Usage Operations ────────────────────────────────────────

    /// Atomically increment today's counter for one action kind.
    ///
    /// Upsert-style: the day document is created on first increment. Callers
    /// treat failures as best-effort (metering never fails a request).
    pub async fn increment_usage(&self, user_id: &str, kind: UsageKind) -> Result<(), AppError> {
        let doc_id = usage_doc_id(user_id, &time_utils::today_key());
        let stamp = UsageDay {
            last_updated: time_utils::now_rfc3339(),
            ..Default::default()
        };

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(firestore::paths!(UsageDay::last_updated))
            .in_col(collections::USAGE)
            .document_id(&doc_id)
            .object(&stamp)
            .transforms(|t| t.fields([t.field(kind.field_name()).increment(1)]))
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Read today's usage counters for a user, if any exist yet.
    pub async fn get_usage_today(&self, user_id: &str) -> Result<Option<UsageDay>, AppError> {
        let doc_id = usage_doc_id(user_id, &time_utils::today_key());
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USAGE)
            .obj()
            .one(&doc_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Collection Operations ───────────────────────────────────

    /// List every saved entry for a user, unordered.
    pub async fn list_collection(
        &self,
        user_id: &str,
    ) -> Result<Vec<SavedCrystalEntry>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::CRYSTAL_COLLECTION)
            .filter(move |q| q.for_all([q.field("user_id").eq(user_id.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Upsert one saved entry, keyed by its id within the user's collection.
    pub async fn save_entry(&self, entry: &SavedCrystalEntry) -> Result<(), AppError> {
        let doc_id = entry_doc_id(&entry.user_id, &entry.id);

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::CRYSTAL_COLLECTION)
            .document_id(&doc_id)
            .object(entry)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

/// Usage document id for a user and day key.
fn usage_doc_id(user_id: &str, day: &str) -> String {
    format!("{}_{}", user_id, day)
}

/// Collection document id; entry ids are caller-supplied, so encode them
/// before embedding in a document path.
fn entry_doc_id(user_id: &str, entry_id: &str) -> String {
    let safe_id = urlencoding::encode(entry_id);
    format!("{}_{}", user_id, safe_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id_shapes() {
        assert_eq!(usage_doc_id("uid1", "2026-03-07"), "uid1_2026-03-07");
        assert_eq!(entry_doc_id("uid1", "entry-1"), "uid1_entry-1");
        // Slashes in caller-supplied ids must not create nested paths.
        assert_eq!(entry_doc_id("uid1", "a/b c"), "uid1_a%2Fb%20c");
    }

    #[tokio::test]
    async fn test_mock_mode_fails_closed() {
        let db = FirestoreDb::new_mock();
        let result = db.get_profile("anyone").await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
