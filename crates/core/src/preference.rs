//! Per-user preference document and the capabilities that persist it.
//!
//! The document is owned by an external store; this crate only reads and
//! replaces it as a whole. Keys this crate does not know about are kept in
//! [`Preference::other`] so a write never drops unrelated settings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::grafana::GrafanaConfig;
use crate::types::DbId;

/// A user's durable settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    /// Grafana credential record; `None` means the integration is not set up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grafana: Option<GrafanaConfig>,
    /// Compute-cluster configuration slot.
    #[serde(rename = "k8sConfig", default, skip_serializing_if = "Option::is_none")]
    pub k8s_config: Option<K8sConfig>,
    /// Every other setting, carried through untouched.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Kubernetes configuration stored alongside the Grafana settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct K8sConfig {
    #[serde(rename = "inClusterConfig", default)]
    pub in_cluster_config: bool,
    /// Raw kubeconfig contents as uploaded by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
    #[serde(rename = "contextName", default, skip_serializing_if = "Option::is_none")]
    pub context_name: Option<String>,
}

impl K8sConfig {
    /// A config is usable when running in-cluster or when a kubeconfig was supplied.
    pub fn is_valid(&self) -> bool {
        self.in_cluster_config || self.config.as_deref().is_some_and(|c| !c.is_empty())
    }
}

impl Preference {
    /// Whether the document holds a usable cluster configuration.
    pub fn has_valid_cluster_config(&self) -> bool {
        self.k8s_config.as_ref().is_some_and(K8sConfig::is_valid)
    }
}

/// Errors raised by a [`PreferenceStore`] backend.
#[derive(Debug, thiserror::Error)]
pub enum PreferenceStoreError {
    /// The backend could not be reached or rejected the operation.
    #[error("Preference storage unavailable: {0}")]
    Backend(String),

    /// A stored document could not be decoded.
    #[error("Stored preference document is malformed: {0}")]
    Corrupt(String),
}

/// Durable storage for preference documents, keyed by user id.
///
/// `read` returns an empty document for users that have never saved
/// anything. `write` replaces the whole document and returns what was stored.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn read(&self, user_id: DbId) -> Result<Preference, PreferenceStoreError>;

    async fn write(
        &self,
        user_id: DbId,
        preference: &Preference,
    ) -> Result<Preference, PreferenceStoreError>;

    /// Round-trip check used by the health endpoint.
    async fn health_check(&self) -> Result<(), PreferenceStoreError> {
        Ok(())
    }
}

/// Reports whether a user currently has a valid compute-cluster configuration.
///
/// An `Err` means the answer could not be determined, not that the
/// configuration is missing.
#[async_trait]
pub trait ClusterConfigProvider: Send + Sync {
    async fn is_valid(&self, user_id: DbId) -> Result<bool, PreferenceStoreError>;
}
