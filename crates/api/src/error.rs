use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dashgate_core::error::CoreError;
use dashgate_core::grafana::GrafanaError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`GrafanaError`] and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A generic domain error from `dashgate_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A Grafana integration failure.
    #[error(transparent)]
    Grafana(#[from] GrafanaError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
            },

            // --- Grafana integration errors ---
            AppError::Grafana(err) => classify_grafana_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a Grafana integration error into an HTTP status, error code, and message.
///
/// - Missing configuration and undecodable input are the caller's problem (400).
/// - Upstream Grafana failures map to 502.
/// - Store failures map to 500 with the detail kept out of the response.
fn classify_grafana_error(err: &GrafanaError) -> (StatusCode, &'static str, String) {
    let message = err.to_string();
    match err {
        GrafanaError::ConfigurationMissing => {
            (StatusCode::BAD_REQUEST, "GRAFANA_NOT_CONFIGURED", message)
        }
        GrafanaError::ClusterConfigMissing => {
            (StatusCode::BAD_REQUEST, "CLUSTER_CONFIG_MISSING", message)
        }
        GrafanaError::DecodeFailure(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", message),
        GrafanaError::ConnectivityFailure(_) => {
            (StatusCode::BAD_GATEWAY, "GRAFANA_UNREACHABLE", message)
        }
        GrafanaError::ListingFailure(_) => {
            (StatusCode::BAD_GATEWAY, "GRAFANA_LISTING_FAILED", message)
        }
        GrafanaError::QueryFailure(_) => {
            (StatusCode::BAD_GATEWAY, "GRAFANA_QUERY_FAILED", message)
        }
        GrafanaError::PersistenceFailure(inner) => {
            tracing::error!(error = %inner, "Preference store error");
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
        }
    }
}
