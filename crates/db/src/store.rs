//! PostgreSQL-backed implementations of the core preference capabilities.

use async_trait::async_trait;
use dashgate_core::preference::{
    ClusterConfigProvider, Preference, PreferenceStore, PreferenceStoreError,
};
use dashgate_core::types::DbId;

use crate::repositories::PreferenceRepo;
use crate::DbPool;

/// [`PreferenceStore`] over the `user_preferences` table.
#[derive(Clone)]
pub struct PgPreferenceStore {
    pool: DbPool,
}

impl PgPreferenceStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PreferenceStore for PgPreferenceStore {
    async fn read(&self, user_id: DbId) -> Result<Preference, PreferenceStoreError> {
        let row = PreferenceRepo::find_by_user(&self.pool, user_id)
            .await
            .map_err(backend)?;

        match row {
            Some(row) => serde_json::from_value(row.document)
                .map_err(|e| PreferenceStoreError::Corrupt(e.to_string())),
            None => Ok(Preference::default()),
        }
    }

    async fn write(
        &self,
        user_id: DbId,
        preference: &Preference,
    ) -> Result<Preference, PreferenceStoreError> {
        let document = serde_json::to_value(preference)
            .map_err(|e| PreferenceStoreError::Corrupt(e.to_string()))?;

        let row = PreferenceRepo::upsert(&self.pool, user_id, &document)
            .await
            .map_err(backend)?;
        tracing::debug!(user_id, updated_at = %row.updated_at, "Preference document stored");

        serde_json::from_value(row.document).map_err(|e| PreferenceStoreError::Corrupt(e.to_string()))
    }

    async fn health_check(&self) -> Result<(), PreferenceStoreError> {
        crate::health_check(&self.pool).await.map_err(backend)
    }
}

/// [`ClusterConfigProvider`] that inspects the `k8sConfig` slot of the user's
/// stored preference document.
#[derive(Clone)]
pub struct StoredClusterConfig<S> {
    store: S,
}

impl<S> StoredClusterConfig<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: PreferenceStore> ClusterConfigProvider for StoredClusterConfig<S> {
    async fn is_valid(&self, user_id: DbId) -> Result<bool, PreferenceStoreError> {
        let preference = self.store.read(user_id).await?;
        Ok(preference.has_valid_cluster_config())
    }
}

fn backend(err: sqlx::Error) -> PreferenceStoreError {
    PreferenceStoreError::Backend(err.to_string())
}
