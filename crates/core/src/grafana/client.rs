//! The dashboard-service capability used by [`GrafanaService`](super::GrafanaService).
//!
//! The production implementation lives in the `dashgate-grafana` crate; tests
//! substitute in-memory doubles.

use async_trait::async_trait;

use super::model::GrafanaBoard;

/// Query-string pairs forwarded verbatim to the dashboard service, in request order.
pub type QueryParams = Vec<(String, String)>;

/// An upstream response body, returned to the caller byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPayload {
    /// Upstream `Content-Type`, if it sent one.
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Failures reported by a [`DashboardClient`].
#[derive(Debug, thiserror::Error)]
pub enum DashboardClientError {
    /// Network, DNS, TLS or timeout failure.
    #[error("Request to dashboard service failed: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("Dashboard service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The service answered 2xx but the body was not what we expected.
    #[error("Unexpected response from dashboard service: {0}")]
    Decode(String),

    /// The request could not be built (bad base URL, missing data source id).
    #[error("Invalid dashboard service request: {0}")]
    InvalidRequest(String),
}

/// Operations against an external dashboard service, authenticated per call.
#[async_trait]
pub trait DashboardClient: Send + Sync {
    /// Authenticated round-trip proving the URL and key are usable.
    async fn validate(&self, url: &str, api_key: &str) -> Result<(), DashboardClientError>;

    /// List boards matching `search` (empty means no filter), in service order.
    async fn list_boards(
        &self,
        url: &str,
        api_key: &str,
        search: &str,
    ) -> Result<Vec<GrafanaBoard>, DashboardClientError>;

    /// Instant query.
    async fn query(
        &self,
        url: &str,
        api_key: &str,
        params: &QueryParams,
    ) -> Result<RawPayload, DashboardClientError>;

    /// Range query.
    async fn query_range(
        &self,
        url: &str,
        api_key: &str,
        params: &QueryParams,
    ) -> Result<RawPayload, DashboardClientError>;
}
