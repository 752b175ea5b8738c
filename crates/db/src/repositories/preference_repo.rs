//! Repository for the `user_preferences` table.

use sqlx::PgPool;
use dashgate_core::types::DbId;

use crate::models::preference::UserPreferenceRow;

/// Column list for `user_preferences` queries.
const COLUMNS: &str = "user_id, document, created_at, updated_at";

/// Provides read/replace access to per-user preference documents.
pub struct PreferenceRepo;

impl PreferenceRepo {
    /// Get the stored document for a user.
    ///
    /// Returns `None` if the user has never saved preferences.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserPreferenceRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_preferences WHERE user_id = $1");
        sqlx::query_as::<_, UserPreferenceRow>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Replace the user's document in a single statement.
    ///
    /// Concurrent writers for the same user race; the last one wins.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        document: &serde_json::Value,
    ) -> Result<UserPreferenceRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_preferences (user_id, document) \
             VALUES ($1, $2) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 document = EXCLUDED.document, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserPreferenceRow>(&query)
            .bind(user_id)
            .bind(document)
            .fetch_one(pool)
            .await
    }
}
