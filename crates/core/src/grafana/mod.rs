//! Grafana integration: credential record, board/panel types, the dashboard
//! client capability, and the request-scoped [`GrafanaService`].

pub mod client;
pub mod error;
pub mod model;
pub mod selection;
pub mod service;

pub use client::{DashboardClient, DashboardClientError, QueryParams, RawPayload};
pub use error::GrafanaError;
pub use model::{GrafanaBoard, GrafanaConfig, SelectedBoardConfig, TemplateVar};
pub use selection::{decode_selection, normalize_selection};
pub use service::GrafanaService;
