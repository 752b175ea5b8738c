//! Handlers for the Grafana integration.
//!
//! Every endpoint acts on the authenticated user's own preference document.
//! Business rules live in [`dashgate_core::grafana::GrafanaService`]; these
//! handlers only translate HTTP in and out.

use axum::body::{Body, Bytes};
use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dashgate_core::grafana::{QueryParams, RawPayload};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, EmptyResponse};
use crate::state::AppState;

/// Form body for `POST /grafana/config`. Missing fields read as empty.
#[derive(Debug, Deserialize)]
pub struct ConfigureGrafana {
    #[serde(rename = "grafanaURL", default)]
    pub grafana_url: String,
    #[serde(rename = "grafanaAPIKey", default)]
    pub grafana_api_key: String,
}

/// Query string for `GET /grafana/boards`.
#[derive(Debug, Default, Deserialize)]
pub struct BoardSearch {
    #[serde(rename = "dashboardSearch", default)]
    pub dashboard_search: String,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// POST /api/v1/grafana/config
///
/// Validate the submitted URL/key against Grafana and store them.
pub async fn configure(
    user: AuthUser,
    State(state): State<AppState>,
    input: Result<Form<ConfigureGrafana>, FormRejection>,
) -> AppResult<impl IntoResponse> {
    let Form(input) = input.map_err(|e| AppError::BadRequest(e.body_text()))?;

    state
        .grafana
        .configure(user.user_id, &input.grafana_url, &input.grafana_api_key)
        .await?;

    Ok(Json(EmptyResponse::default()))
}

/// DELETE /api/v1/grafana/config
///
/// Remove the Grafana configuration and any pinned boards.
pub async fn remove(user: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    state.grafana.remove(user.user_id).await?;
    Ok(Json(EmptyResponse::default()))
}

/// GET /api/v1/grafana/config
///
/// Current configuration with the API key masked; `data` is `null` when unset.
pub async fn get_config(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let config = state.grafana.get_config(user.user_id).await?;
    Ok(Json(DataResponse { data: config }))
}

/// GET /api/v1/grafana/ping
pub async fn ping(user: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    state.grafana.check_connectivity(user.user_id).await?;
    Ok(Json(EmptyResponse::default()))
}

// ---------------------------------------------------------------------------
// Boards
// ---------------------------------------------------------------------------

/// GET /api/v1/grafana/boards?dashboardSearch=
pub async fn list_boards(
    user: AuthUser,
    State(state): State<AppState>,
    search: Result<Query<BoardSearch>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(search) = search.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let boards = state
        .grafana
        .list_boards(user.user_id, &search.dashboard_search)
        .await?;

    Ok(Json(DataResponse { data: boards }))
}

/// POST /api/v1/grafana/boards
///
/// Replace the pinned board selection. The body is decoded by the service so
/// malformed input is reported as a decode failure.
pub async fn save_selection(
    user: AuthUser,
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    state.grafana.save_selection(user.user_id, &body).await?;
    Ok(Json(EmptyResponse::default()))
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// GET /api/v1/grafana/query
pub async fn query(
    user: AuthUser,
    State(state): State<AppState>,
    params: Result<Query<QueryParams>, QueryRejection>,
) -> AppResult<Response> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let payload = state.grafana.query(user.user_id, &params).await?;
    Ok(raw_response(payload))
}

/// GET /api/v1/grafana/query_range
pub async fn query_range(
    user: AuthUser,
    State(state): State<AppState>,
    params: Result<Query<QueryParams>, QueryRejection>,
) -> AppResult<Response> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let payload = state.grafana.query_range(user.user_id, &params).await?;
    Ok(raw_response(payload))
}

/// Pass the upstream body and content type through untouched.
fn raw_response(payload: RawPayload) -> Response {
    let mut response = Response::new(Body::from(payload.body));
    if let Some(value) = payload
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
    {
        response.headers_mut().insert(CONTENT_TYPE, value);
    }
    response
}
