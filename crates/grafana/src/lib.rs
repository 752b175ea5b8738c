//! Grafana HTTP API client.
//!
//! [`api::GrafanaApi`] talks to a Grafana instance with per-call credentials
//! and implements [`dashgate_core::grafana::DashboardClient`].

pub mod api;
pub mod dashboard;

pub use api::{GrafanaApi, GrafanaApiError};
