use std::sync::Arc;

use dashgate_core::grafana::GrafanaService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (read by the auth extractor).
    pub config: Arc<ServerConfig>,
    /// Grafana integration operations, wired to the preference store,
    /// cluster-config provider and Grafana client.
    pub grafana: GrafanaService,
}
