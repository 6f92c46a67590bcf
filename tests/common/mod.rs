//! Shared fixtures: the full router wired to in-memory collaborators.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use scanfleet::config::{ConfigManager, ScanFleetConfig};
use scanfleet::database::InMemoryBannerStore;
use scanfleet::fleet::InMemorySupervisor;
use scanfleet::messaging::InMemoryRpcTransport;
use scanfleet::models::{BannerRow, WorkerState};
use scanfleet::orchestration::OrchestrationBootstrap;

pub struct TestApp {
    pub router: Router,
    pub transport: Arc<InMemoryRpcTransport>,
    pub supervisor: Arc<InMemorySupervisor>,
    pub store: Arc<InMemoryBannerStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_parts(
            InMemoryRpcTransport::new(),
            default_fleet(),
            InMemoryBannerStore::new(default_rows()),
        )
    }

    pub fn with_parts(
        transport: InMemoryRpcTransport,
        supervisor: InMemorySupervisor,
        store: InMemoryBannerStore,
    ) -> Self {
        Self::with_config(ScanFleetConfig::default(), transport, supervisor, store)
    }

    pub fn with_config(
        config: ScanFleetConfig,
        transport: InMemoryRpcTransport,
        supervisor: InMemorySupervisor,
        store: InMemoryBannerStore,
    ) -> Self {
        let transport = Arc::new(transport);
        let supervisor = Arc::new(supervisor);
        let store = Arc::new(store);

        let config_manager = ConfigManager::from_config(config, "test")
            .expect("test configuration is valid");
        let handle = OrchestrationBootstrap::bootstrap_in_memory(
            config_manager,
            transport.clone(),
            supervisor.clone(),
            store.clone(),
        );

        Self {
            router: handle.router(),
            transport,
            supervisor,
            store,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, uri: &str, body: impl Into<Body>) -> (StatusCode, Vec<u8>) {
        self.send(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }
}

pub fn default_fleet() -> InMemorySupervisor {
    InMemorySupervisor::with_workers([
        ("w1", WorkerState::Running),
        ("w2", WorkerState::Paused),
    ])
}

pub fn default_rows() -> Vec<BannerRow> {
    vec![BannerRow {
        ip: "10.0.0.1".to_string(),
        port: 80,
        service: "http".to_string(),
        content: b"hello".to_vec(),
    }]
}

pub fn json(body: &[u8]) -> serde_json::Value {
    serde_json::from_slice(body).expect("response body is JSON")
}
