//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use dashgate_api::error::AppError;
use dashgate_core::error::CoreError;
use dashgate_core::grafana::GrafanaError;
use dashgate_core::preference::PreferenceStoreError;
use http_body_util::BodyExt;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn unauthorized_returns_401() {
    let err = AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Invalid or expired token");
}

#[tokio::test]
async fn bad_request_returns_400() {
    let err = AppError::BadRequest("invalid field value".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid field value");
}

#[tokio::test]
async fn grafana_errors_map_to_expected_status_and_code() {
    let cases = [
        (GrafanaError::ConfigurationMissing, StatusCode::BAD_REQUEST, "GRAFANA_NOT_CONFIGURED"),
        (GrafanaError::ClusterConfigMissing, StatusCode::BAD_REQUEST, "CLUSTER_CONFIG_MISSING"),
        (GrafanaError::DecodeFailure("eof".into()), StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        (
            GrafanaError::ConnectivityFailure("refused".into()),
            StatusCode::BAD_GATEWAY,
            "GRAFANA_UNREACHABLE",
        ),
        (
            GrafanaError::ListingFailure("500".into()),
            StatusCode::BAD_GATEWAY,
            "GRAFANA_LISTING_FAILED",
        ),
        (
            GrafanaError::QueryFailure("404".into()),
            StatusCode::BAD_GATEWAY,
            "GRAFANA_QUERY_FAILED",
        ),
    ];

    for (err, expected_status, expected_code) in cases {
        let (status, json) = error_to_response(AppError::Grafana(err)).await;
        assert_eq!(status, expected_status);
        assert_eq!(json["code"], expected_code);
    }
}

#[tokio::test]
async fn upstream_detail_is_not_leaked() {
    let err = AppError::Grafana(GrafanaError::ConnectivityFailure(
        "dial tcp 10.0.0.5:3000: connection refused".into(),
    ));

    let (_, json) = error_to_response(err).await;

    assert_eq!(json["error"], "Connection to Grafana failed");
}

#[tokio::test]
async fn persistence_failure_returns_500_and_sanitizes_message() {
    let err = AppError::Grafana(GrafanaError::PersistenceFailure(
        PreferenceStoreError::Backend("password authentication failed for user dashgate".into()),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "Unable to save user config data");
    assert!(!json["error"].as_str().unwrap().contains("password"));
}
