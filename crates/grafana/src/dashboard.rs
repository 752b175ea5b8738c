//! Grafana API response shapes and their conversion into [`GrafanaBoard`].

use serde::Deserialize;
use serde_json::Value;

use dashgate_core::grafana::{GrafanaBoard, TemplateVar};

/// Response of `GET /api/org`.
#[derive(Debug, Deserialize)]
pub struct Org {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// One entry of `GET /api/search`.
#[derive(Debug, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub id: i64,
    pub uid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub url: String,
}

/// Response of `GET /api/dashboards/uid/{uid}`.
#[derive(Debug, Deserialize)]
pub struct DashboardDetail {
    pub dashboard: DashboardModel,
    #[serde(default)]
    pub meta: DashboardMeta,
}

#[derive(Debug, Deserialize)]
pub struct DashboardModel {
    #[serde(default)]
    pub panels: Vec<Value>,
    #[serde(default)]
    pub templating: Templating,
}

#[derive(Debug, Default, Deserialize)]
pub struct Templating {
    #[serde(default)]
    pub list: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardMeta {
    #[serde(default)]
    pub slug: String,
}

/// Assemble a board from a search hit and its dashboard detail.
pub fn build_board(hit: SearchHit, detail: DashboardDetail, org_id: i64) -> GrafanaBoard {
    let slug = if detail.meta.slug.is_empty() {
        slug_from_uri(&hit.uri)
    } else {
        detail.meta.slug
    };

    GrafanaBoard {
        id: hit.id,
        uri: hit.uri,
        title: hit.title,
        uid: hit.uid,
        slug,
        org_id,
        panels: flatten_panels(detail.dashboard.panels),
        template_vars: detail
            .dashboard
            .templating
            .list
            .iter()
            .filter_map(template_var)
            .collect(),
    }
}

/// Replace each row panel by the panels collapsed inside it.
pub fn flatten_panels(panels: Vec<Value>) -> Vec<Value> {
    let mut out = Vec::with_capacity(panels.len());
    for mut panel in panels {
        if panel.get("type").and_then(Value::as_str) == Some("row") {
            if let Some(Value::Array(nested)) = panel.get_mut("panels").map(Value::take) {
                out.extend(nested);
            }
        } else {
            out.push(panel);
        }
    }
    out
}

/// Convert one `templating.list` entry. Entries without a name are skipped.
pub fn template_var(raw: &Value) -> Option<TemplateVar> {
    let name = raw.get("name")?.as_str()?.to_string();

    // Newer Grafana versions wrap the query in an object.
    let query = match raw.get("query") {
        Some(Value::String(q)) => q.clone(),
        Some(Value::Object(obj)) => obj
            .get("query")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    };

    let hide = raw
        .get("hide")
        .and_then(Value::as_u64)
        .and_then(|h| u8::try_from(h).ok())
        .unwrap_or(0);

    Some(TemplateVar {
        name,
        query,
        datasource: raw.get("datasource").filter(|d| !d.is_null()).cloned(),
        hide,
        value: raw.get("current").and_then(|c| c.get("value")).cloned(),
    })
}

/// `db/node-exporter` -> `node-exporter`.
fn slug_from_uri(uri: &str) -> String {
    uri.rsplit('/').next().unwrap_or_default().to_string()
}
