//! REST client for the Grafana HTTP API.
//!
//! Credentials are passed on every call rather than stored, so one
//! [`GrafanaApi`] (and its connection pool) serves every user.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Url};

use dashgate_core::grafana::{
    DashboardClient, DashboardClientError, GrafanaBoard, QueryParams, RawPayload,
};

use crate::dashboard::{build_board, DashboardDetail, Org, SearchHit};

/// Query parameter naming the data source to proxy through.
pub const DATASOURCE_PARAM: &str = "dsid";

/// HTTP client for Grafana instances.
#[derive(Clone)]
pub struct GrafanaApi {
    client: reqwest::Client,
}

/// Errors from the Grafana REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum GrafanaApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, body decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Grafana returned a non-2xx status code.
    #[error("Grafana API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The request could not be built from the given inputs.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<GrafanaApiError> for DashboardClientError {
    fn from(err: GrafanaApiError) -> Self {
        match err {
            GrafanaApiError::Request(e) if e.is_decode() => Self::Decode(e.to_string()),
            GrafanaApiError::Request(e) => Self::Transport(e.to_string()),
            GrafanaApiError::ApiError { status, body } => Self::Status { status, body },
            GrafanaApiError::InvalidRequest(msg) => Self::InvalidRequest(msg),
        }
    }
}

impl GrafanaApi {
    /// Create a client whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, GrafanaApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Fetch the organisation the API key belongs to.
    ///
    /// Sends `GET /api/org`; used both as the connectivity check and to
    /// stamp listed boards with their `org_id`.
    pub async fn get_org(&self, base_url: &str, api_key: &str) -> Result<Org, GrafanaApiError> {
        let url = endpoint(base_url, "api/org")?;
        let response = authorized(self.client.get(url), api_key).send().await?;
        Self::parse_response(response).await
    }

    /// Search dashboards by title.
    ///
    /// Sends `GET /api/search?type=dash-db[&query=..]`.
    pub async fn search_dashboards(
        &self,
        base_url: &str,
        api_key: &str,
        search: &str,
    ) -> Result<Vec<SearchHit>, GrafanaApiError> {
        let mut url = endpoint(base_url, "api/search")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("type", "dash-db");
            if !search.is_empty() {
                pairs.append_pair("query", search);
            }
        }

        let response = authorized(self.client.get(url), api_key).send().await?;
        Self::parse_response(response).await
    }

    /// Fetch a dashboard's full model by UID.
    pub async fn get_dashboard(
        &self,
        base_url: &str,
        api_key: &str,
        uid: &str,
    ) -> Result<DashboardDetail, GrafanaApiError> {
        let uid = path_segment("uid", uid)?;
        let url = endpoint(base_url, &format!("api/dashboards/uid/{uid}"))?;
        let response = authorized(self.client.get(url), api_key).send().await?;
        Self::parse_response(response).await
    }

    /// Search dashboards and expand each hit into a [`GrafanaBoard`] with
    /// its panels and template variables, preserving search order.
    pub async fn get_boards(
        &self,
        base_url: &str,
        api_key: &str,
        search: &str,
    ) -> Result<Vec<GrafanaBoard>, GrafanaApiError> {
        let org = self.get_org(base_url, api_key).await?;
        let hits = self.search_dashboards(base_url, api_key, search).await?;

        let mut boards = Vec::with_capacity(hits.len());
        for hit in hits {
            let detail = self.get_dashboard(base_url, api_key, &hit.uid).await?;
            boards.push(build_board(hit, detail, org.id));
        }
        Ok(boards)
    }

    /// Proxy a Prometheus-style query through a Grafana data source.
    ///
    /// `endpoint_name` is `query` or `query_range`. The `dsid` parameter picks
    /// the data source; every other parameter is forwarded unchanged.
    pub async fn datasource_query(
        &self,
        base_url: &str,
        api_key: &str,
        endpoint_name: &str,
        params: &QueryParams,
    ) -> Result<RawPayload, GrafanaApiError> {
        let dsid = params
            .iter()
            .find(|(k, _)| k == DATASOURCE_PARAM)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                GrafanaApiError::InvalidRequest(format!("missing `{DATASOURCE_PARAM}` parameter"))
            })?;
        let dsid = path_segment(DATASOURCE_PARAM, dsid)?;

        let mut url = endpoint(
            base_url,
            &format!("api/datasources/proxy/{dsid}/api/v1/{endpoint_name}"),
        )?;
        let forwarded: Vec<_> = params.iter().filter(|(k, _)| k != DATASOURCE_PARAM).collect();
        if !forwarded.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(forwarded.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        tracing::debug!(%url, "Proxying Grafana data source query");
        let response = authorized(self.client.get(url), api_key).send().await?;
        let response = Self::ensure_success(response).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        Ok(RawPayload { content_type, body })
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`GrafanaApiError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GrafanaApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GrafanaApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GrafanaApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl DashboardClient for GrafanaApi {
    async fn validate(&self, url: &str, api_key: &str) -> Result<(), DashboardClientError> {
        let org = self.get_org(url, api_key).await?;
        tracing::debug!(grafana_url = %url, org_id = org.id, org = %org.name, "Grafana credentials accepted");
        Ok(())
    }

    async fn list_boards(
        &self,
        url: &str,
        api_key: &str,
        search: &str,
    ) -> Result<Vec<GrafanaBoard>, DashboardClientError> {
        Ok(self.get_boards(url, api_key, search).await?)
    }

    async fn query(
        &self,
        url: &str,
        api_key: &str,
        params: &QueryParams,
    ) -> Result<RawPayload, DashboardClientError> {
        Ok(self.datasource_query(url, api_key, "query", params).await?)
    }

    async fn query_range(
        &self,
        url: &str,
        api_key: &str,
        params: &QueryParams,
    ) -> Result<RawPayload, DashboardClientError> {
        Ok(self.datasource_query(url, api_key, "query_range", params).await?)
    }
}

/// Join `path` onto the base URL, keeping any sub-path the base carries.
fn endpoint(base_url: &str, path: &str) -> Result<Url, GrafanaApiError> {
    let joined = format!("{}/{}", base_url.trim_end_matches('/'), path);
    Url::parse(&joined).map_err(|e| GrafanaApiError::InvalidRequest(format!("{base_url}: {e}")))
}

/// Accept `value` only as one plain path segment (Grafana ids and UIDs).
fn path_segment<'a>(name: &str, value: &'a str) -> Result<&'a str, GrafanaApiError> {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if plain {
        Ok(value)
    } else {
        Err(GrafanaApiError::InvalidRequest(format!(
            "invalid `{name}` value: {value:?}"
        )))
    }
}

/// Attach the bearer token unless the instance is used anonymously.
fn authorized(builder: RequestBuilder, api_key: &str) -> RequestBuilder {
    if api_key.is_empty() {
        builder
    } else {
        builder.bearer_auth(api_key)
    }
}
