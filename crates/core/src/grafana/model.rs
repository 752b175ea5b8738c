//! Credential record and board/panel types.
//!
//! JSON field names match what the dashboard UI already sends and stores
//! (`grafanaURL`, `selectedBoardsConfigs`, `templateVars`, ...), so existing
//! preference documents deserialize unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder returned instead of a stored API key.
pub const MASKED_API_KEY: &str = "********";

/// A user's Grafana credential record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrafanaConfig {
    /// Base URL of the Grafana instance. Empty means "not configured".
    #[serde(rename = "grafanaURL", default)]
    pub url: String,
    /// Bearer token for the Grafana HTTP API. May be empty.
    #[serde(rename = "grafanaAPIKey", default)]
    pub api_key: String,
    /// Pinned boards and panels. Never `Some(vec![])`; see
    /// [`normalize_selection`](super::normalize_selection).
    #[serde(
        rename = "selectedBoardsConfigs",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub selected_boards: Option<Vec<SelectedBoardConfig>>,
}

impl GrafanaConfig {
    /// Build a fresh record with no selection.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            selected_boards: None,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
    }

    /// Copy of the record safe to hand back to a client.
    pub fn masked(&self) -> Self {
        let api_key = if self.api_key.is_empty() {
            String::new()
        } else {
            MASKED_API_KEY.to_string()
        };
        Self {
            api_key,
            ..self.clone()
        }
    }
}

/// One pinned board together with the panels and template variables chosen for it.
///
/// Stored exactly as the UI sent it: `board` stays raw JSON and unknown keys
/// are carried in [`other`](Self::other).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedBoardConfig {
    pub board: Value,
    #[serde(default)]
    pub panels: Vec<Value>,
    #[serde(rename = "templateVars", default)]
    pub template_vars: Vec<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// A dashboard as listed by the Grafana API.
///
/// Panels are kept as raw JSON; their schema belongs to Grafana.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrafanaBoard {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub org_id: i64,
    #[serde(default)]
    pub panels: Vec<Value>,
    #[serde(default)]
    pub template_vars: Vec<TemplateVar>,
}

/// A dashboard templating variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateVar {
    pub name: String,
    #[serde(default)]
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<Value>,
    #[serde(default)]
    pub hide: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}
