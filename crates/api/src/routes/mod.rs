pub mod grafana;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /grafana/config                                  get, configure (POST), remove (DELETE)
/// /grafana/ping                                    connectivity check
/// /grafana/boards                                  list (GET), save selection (POST)
/// /grafana/query                                   instant query proxy
/// /grafana/query_range                             range query proxy
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/grafana", grafana::router())
}
