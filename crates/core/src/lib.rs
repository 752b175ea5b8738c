//! Domain layer for the Grafana integration gateway.
//!
//! Holds the preference document model, the Grafana credential record and
//! selection types, the error taxonomy, and [`grafana::GrafanaService`],
//! which implements every integration operation against injected
//! capabilities (preference store, cluster-config provider, dashboard client).

pub mod error;
pub mod grafana;
pub mod preference;
pub mod types;
