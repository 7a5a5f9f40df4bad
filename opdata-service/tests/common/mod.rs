//! Shared setup for opdata-service integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use opdata_service::config::{MongoConfig, OpDataConfig};
use opdata_service::services::{InMemoryStore, OpDataDb, OpDataService};
use opdata_service::startup::{build_router, AppState, Application};
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Router backed by an in-memory store; no MongoDB required.
pub struct TestRouter {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
}

impl TestRouter {
    pub fn new() -> Self {
        Self::with_store(InMemoryStore::new(), TEST_TIMEOUT)
    }

    pub fn with_store(store: InMemoryStore, timeout: Duration) -> Self {
        let store = Arc::new(store);
        let state = AppState {
            op_data: OpDataService::new(store.clone(), timeout),
        };
        Self {
            router: build_router(state),
            store,
        }
    }

    /// Send one request and return the status and the parsed JSON body
    /// (`Null` when the body is empty or not JSON).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

        (status, json)
    }
}

/// Application running against a live MongoDB on a random port.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: OpDataDb,
    pub db_name: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let db_name = format!("opdata_test_{}", Uuid::new_v4().simple());

        let config = OpDataConfig {
            common: CoreConfig {
                port: 0,
                log_level: "info".to_string(),
            },
            mongodb: MongoConfig {
                uri,
                database: db_name.clone(),
                collection: "opdata".to_string(),
            },
            store_timeout: TEST_TIMEOUT,
            otlp_endpoint: None,
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            db_name,
        }
    }

    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::new()
    }

    pub async fn cleanup(&self) {
        let _ = self.db.client().database(&self.db_name).drop(None).await;
    }
}
