//! Shared helpers for the API integration tests.
//!
//! The application is built over an in-memory preference store and a fake
//! Grafana client, so these tests need neither a database nor a network.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use dashgate_api::auth::jwt::{generate_access_token, JwtConfig};
use dashgate_api::config::ServerConfig;
use dashgate_api::router::build_app_router;
use dashgate_api::state::AppState;
use dashgate_core::grafana::{
    DashboardClient, DashboardClientError, GrafanaBoard, GrafanaService, QueryParams, RawPayload,
};
use dashgate_core::preference::{Preference, PreferenceStore, PreferenceStoreError};
use dashgate_core::types::DbId;
use dashgate_db::StoredClusterConfig;

/// The only API key the fake Grafana accepts.
pub const GOOD_KEY: &str = "good-key";

/// Body the fake Grafana returns for every proxied query.
pub const QUERY_BODY: &str = r#"{"status":"success","data":{"resultType":"vector","result":[]}}"#;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        grafana_timeout_secs: 5,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Mint a valid bearer token for `user_id`.
pub fn token_for(user_id: DbId) -> String {
    generate_access_token(user_id, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// In-memory [`PreferenceStore`] that counts writes.
#[derive(Clone, Default)]
pub struct MemoryStore {
    docs: Arc<Mutex<HashMap<DbId, Preference>>>,
    writes: Arc<AtomicUsize>,
    unhealthy: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn get(&self, user_id: DbId) -> Preference {
        self.docs
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn put(&self, user_id: DbId, preference: Preference) {
        self.docs.lock().unwrap().insert(user_id, preference);
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_unhealthy(&self) {
        self.unhealthy.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn read(&self, user_id: DbId) -> Result<Preference, PreferenceStoreError> {
        Ok(self.get(user_id))
    }

    async fn write(
        &self,
        user_id: DbId,
        preference: &Preference,
    ) -> Result<Preference, PreferenceStoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.put(user_id, preference.clone());
        Ok(preference.clone())
    }

    async fn health_check(&self) -> Result<(), PreferenceStoreError> {
        if self.unhealthy.load(Ordering::SeqCst) {
            return Err(PreferenceStoreError::Backend("connection refused".into()));
        }
        Ok(())
    }
}

/// Fake Grafana that accepts [`GOOD_KEY`] on any non-empty URL.
#[derive(Clone, Default)]
pub struct FakeGrafana {
    calls: Arc<AtomicUsize>,
    last_params: Arc<Mutex<Option<QueryParams>>>,
}

impl FakeGrafana {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_params(&self) -> Option<QueryParams> {
        self.last_params.lock().unwrap().clone()
    }

    fn check(&self, api_key: &str) -> Result<(), DashboardClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if api_key == GOOD_KEY {
            Ok(())
        } else {
            Err(DashboardClientError::Status {
                status: 401,
                body: "Invalid API key".into(),
            })
        }
    }

    fn payload(&self, params: &QueryParams) -> RawPayload {
        *self.last_params.lock().unwrap() = Some(params.clone());
        RawPayload {
            content_type: Some("application/json".into()),
            body: QUERY_BODY.as_bytes().to_vec(),
        }
    }
}

#[async_trait]
impl DashboardClient for FakeGrafana {
    async fn validate(&self, _url: &str, api_key: &str) -> Result<(), DashboardClientError> {
        self.check(api_key)
    }

    async fn list_boards(
        &self,
        _url: &str,
        api_key: &str,
        search: &str,
    ) -> Result<Vec<GrafanaBoard>, DashboardClientError> {
        self.check(api_key)?;
        let boards = ["Node Exporter", "Kubernetes"]
            .iter()
            .enumerate()
            .filter(|(_, title)| title.to_lowercase().contains(&search.to_lowercase()))
            .map(|(i, title)| GrafanaBoard {
                id: i as i64 + 1,
                uid: format!("uid-{}", i + 1),
                title: title.to_string(),
                ..Default::default()
            })
            .collect();
        Ok(boards)
    }

    async fn query(
        &self,
        _url: &str,
        api_key: &str,
        params: &QueryParams,
    ) -> Result<RawPayload, DashboardClientError> {
        self.check(api_key)?;
        Ok(self.payload(params))
    }

    async fn query_range(
        &self,
        _url: &str,
        api_key: &str,
        params: &QueryParams,
    ) -> Result<RawPayload, DashboardClientError> {
        self.check(api_key)?;
        Ok(self.payload(params))
    }
}

/// A built application plus handles on its doubles.
pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
    pub grafana: FakeGrafana,
}

/// Build the full application router with the production middleware stack
/// over fresh test doubles.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let store = MemoryStore::default();
    let grafana = FakeGrafana::default();

    let service = GrafanaService::new(
        Arc::new(store.clone()),
        Arc::new(StoredClusterConfig::new(store.clone())),
        Arc::new(grafana.clone()),
    );
    let state = AppState {
        config: Arc::new(config.clone()),
        grafana: service,
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        grafana,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

/// Unauthenticated GET.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::delete(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// POST an `application/x-www-form-urlencoded` body.
pub async fn post_form_auth(app: Router, uri: &str, form: &str, token: &str) -> Response<Body> {
    let request = Request::post(uri)
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST a raw body with a JSON content type.
pub async fn post_raw_auth(app: Router, uri: &str, body: &str, token: &str) -> Response<Body> {
    let request = Request::post(uri)
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
