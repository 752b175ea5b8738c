//! Route definitions for the Grafana integration.

use axum::routing::get;
use axum::Router;

use crate::handlers::grafana;
use crate::state::AppState;

/// Grafana routes mounted at `/grafana`.
///
/// ```text
/// GET    /config       -> get_config
/// POST   /config       -> configure
/// DELETE /config       -> remove
/// GET    /ping         -> ping
/// GET    /boards       -> list_boards
/// POST   /boards       -> save_selection
/// GET    /query        -> query
/// GET    /query_range  -> query_range
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/config",
            get(grafana::get_config)
                .post(grafana::configure)
                .delete(grafana::remove),
        )
        .route("/ping", get(grafana::ping))
        .route(
            "/boards",
            get(grafana::list_boards).post(grafana::save_selection),
        )
        .route("/query", get(grafana::query))
        .route("/query_range", get(grafana::query_range))
}
