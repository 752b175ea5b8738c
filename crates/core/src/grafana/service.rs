//! Request-scoped Grafana integration operations.
//!
//! Every operation loads the caller's preference document from the store,
//! works on a local copy, and writes the whole document back only after all
//! checks have passed. Nothing is cached between calls.

use std::sync::Arc;

use super::client::{DashboardClient, QueryParams, RawPayload};
use super::error::GrafanaError;
use super::model::{GrafanaBoard, GrafanaConfig};
use super::selection::{decode_selection, normalize_selection};
use crate::preference::{ClusterConfigProvider, Preference, PreferenceStore};
use crate::types::DbId;

/// Grafana integration operations over injected capabilities.
///
/// Cheap to clone; all collaborators are behind `Arc`.
#[derive(Clone)]
pub struct GrafanaService {
    store: Arc<dyn PreferenceStore>,
    cluster: Arc<dyn ClusterConfigProvider>,
    client: Arc<dyn DashboardClient>,
}

impl GrafanaService {
    pub fn new(
        store: Arc<dyn PreferenceStore>,
        cluster: Arc<dyn ClusterConfigProvider>,
        client: Arc<dyn DashboardClient>,
    ) -> Self {
        Self {
            store,
            cluster,
            client,
        }
    }

    /// Shared handle to the preference store (used by the health endpoint).
    pub fn store(&self) -> &Arc<dyn PreferenceStore> {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    /// Create or replace the credential record.
    ///
    /// The candidate is validated against Grafana before anything is written;
    /// a replaced record loses its previous panel selection.
    pub async fn configure(
        &self,
        user_id: DbId,
        url: &str,
        api_key: &str,
    ) -> Result<(), GrafanaError> {
        let mut preference = self.load(user_id).await?;

        let candidate = GrafanaConfig::new(url, api_key);
        self.validate(&candidate).await?;
        tracing::debug!(user_id, grafana_url = %url, "Connection to Grafana succeeded");

        preference.grafana = Some(candidate);
        self.commit(user_id, &preference).await?;

        tracing::info!(user_id, grafana_url = %url, "Grafana configuration saved");
        Ok(())
    }

    /// Delete the credential record together with its selection.
    pub async fn remove(&self, user_id: DbId) -> Result<(), GrafanaError> {
        let mut preference = self.load(user_id).await?;
        preference.grafana = None;
        self.commit(user_id, &preference).await?;

        tracing::info!(user_id, "Grafana configuration removed");
        Ok(())
    }

    /// The stored record with its API key masked, or `None` if absent.
    pub async fn get_config(&self, user_id: DbId) -> Result<Option<GrafanaConfig>, GrafanaError> {
        let preference = self.load(user_id).await?;
        Ok(preference.grafana.as_ref().map(GrafanaConfig::masked))
    }

    /// Validate the stored record, provided a cluster config is also present.
    pub async fn check_connectivity(&self, user_id: DbId) -> Result<(), GrafanaError> {
        let preference = self.load(user_id).await?;
        let record = configured(&preference)?;

        let has_cluster_config = self.cluster.is_valid(user_id).await.map_err(|e| {
            tracing::error!(user_id, error = %e, "Unable to read cluster config");
            GrafanaError::PersistenceFailure(e)
        })?;
        if !has_cluster_config {
            tracing::error!(user_id, "No valid kubernetes config found");
            return Err(GrafanaError::ClusterConfigMissing);
        }

        self.validate(record).await
    }

    // -----------------------------------------------------------------------
    // Boards and queries
    // -----------------------------------------------------------------------

    /// List boards, re-validating the stored credentials first.
    pub async fn list_boards(
        &self,
        user_id: DbId,
        search: &str,
    ) -> Result<Vec<GrafanaBoard>, GrafanaError> {
        let preference = self.load(user_id).await?;
        let record = configured(&preference)?;

        self.validate(record).await?;

        let boards = self
            .client
            .list_boards(&record.url, &record.api_key, search)
            .await
            .map_err(|e| {
                tracing::error!(user_id, error = %e, "Unable to get Grafana boards");
                GrafanaError::ListingFailure(e.to_string())
            })?;

        tracing::debug!(user_id, count = boards.len(), search, "Listed Grafana boards");
        Ok(boards)
    }

    /// Forward an instant query. Credentials are not re-validated.
    pub async fn query(
        &self,
        user_id: DbId,
        params: &QueryParams,
    ) -> Result<RawPayload, GrafanaError> {
        let preference = self.load(user_id).await?;
        let record = configured(&preference)?;

        self.client
            .query(&record.url, &record.api_key, params)
            .await
            .map_err(|e| query_failure(user_id, e.to_string()))
    }

    /// Forward a range query. Credentials are not re-validated.
    pub async fn query_range(
        &self,
        user_id: DbId,
        params: &QueryParams,
    ) -> Result<RawPayload, GrafanaError> {
        let preference = self.load(user_id).await?;
        let record = configured(&preference)?;

        self.client
            .query_range(&record.url, &record.api_key, params)
            .await
            .map_err(|e| query_failure(user_id, e.to_string()))
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Replace the pinned selection with the boards encoded in `body`.
    pub async fn save_selection(&self, user_id: DbId, body: &[u8]) -> Result<(), GrafanaError> {
        let mut preference = self.load(user_id).await?;
        configured(&preference)?;

        let boards = decode_selection(body).inspect_err(|e| {
            tracing::warn!(user_id, error = ?e.detail(), "Rejected Grafana board selection");
        })?;
        let count = boards.len();

        if let Some(record) = preference.grafana.as_mut() {
            record.selected_boards = normalize_selection(boards);
        }
        self.commit(user_id, &preference).await?;

        tracing::info!(user_id, count, "Grafana board selection saved");
        Ok(())
    }

    // ---- private helpers ----

    async fn load(&self, user_id: DbId) -> Result<Preference, GrafanaError> {
        self.store.read(user_id).await.map_err(|e| {
            tracing::error!(user_id, error = %e, "Unable to load user config data");
            GrafanaError::PersistenceFailure(e)
        })
    }

    async fn commit(&self, user_id: DbId, preference: &Preference) -> Result<(), GrafanaError> {
        self.store.write(user_id, preference).await.map_err(|e| {
            tracing::error!(user_id, error = %e, "Unable to save user config data");
            GrafanaError::PersistenceFailure(e)
        })?;
        Ok(())
    }

    async fn validate(&self, record: &GrafanaConfig) -> Result<(), GrafanaError> {
        if !record.is_configured() {
            return Err(GrafanaError::ConnectivityFailure(
                "Grafana URL is empty".to_string(),
            ));
        }

        self.client
            .validate(&record.url, &record.api_key)
            .await
            .map_err(|e| {
                tracing::warn!(grafana_url = %record.url, error = %e, "Connection to Grafana failed");
                GrafanaError::ConnectivityFailure(e.to_string())
            })
    }
}

/// The configured credential record, or `ConfigurationMissing`.
fn configured(preference: &Preference) -> Result<&GrafanaConfig, GrafanaError> {
    preference
        .grafana
        .as_ref()
        .filter(|g| g.is_configured())
        .ok_or(GrafanaError::ConfigurationMissing)
}

fn query_failure(user_id: DbId, detail: String) -> GrafanaError {
    tracing::error!(user_id, error = %detail, "Unable to query Grafana");
    GrafanaError::QueryFailure(detail)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
