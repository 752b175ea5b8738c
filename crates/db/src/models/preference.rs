use serde::Serialize;
use sqlx::FromRow;
use dashgate_core::types::{DbId, Timestamp};

/// A row from the `user_preferences` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserPreferenceRow {
    pub user_id: DbId,
    /// Serialized [`dashgate_core::preference::Preference`].
    pub document: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
