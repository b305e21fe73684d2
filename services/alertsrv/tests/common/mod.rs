//! Common test utilities and helpers

#![allow(dead_code)]
#![allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable

use std::collections::HashSet;
use std::sync::Arc;

use alert_kv::{Backend, BackendKind, KvError, KvStore, MemoryKv};
use alertsrv::{api, AlertConfig, AppState, SteppingTimeProvider};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;

/// 2024-05-01T12:00:00.000Z
pub const START_MS: i64 = 1_714_564_800_000;

pub fn test_config() -> AlertConfig {
    let mut config = AlertConfig::default();
    config.backend.kind = BackendKind::Memory;
    config
}

/// Router over the given backend, clock advancing 1 ms per read
pub fn create_test_router(backend: Backend) -> Router {
    let state = AppState::new(
        Arc::new(test_config()),
        backend,
        Arc::new(SteppingTimeProvider::new(START_MS, 1)),
    )
    .unwrap();
    api::create_router(state)
}

/// Router plus a handle on its in-memory store
pub fn create_memory_router() -> (Router, MemoryKv) {
    let kv = MemoryKv::new();
    (create_test_router(Backend::configured(kv.clone())), kv)
}

/// Backend whose every command fails
pub struct FailingKv;

fn refused() -> KvError {
    KvError::Transport("connection refused".to_string())
}

#[async_trait]
impl KvStore for FailingKv {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn get(&self, _key: &str) -> alert_kv::Result<Option<String>> {
        Err(refused())
    }

    async fn set(&self, _key: &str, _value: &str) -> alert_kv::Result<()> {
        Err(refused())
    }

    async fn lpush(&self, _key: &str, _value: &str) -> alert_kv::Result<u64> {
        Err(refused())
    }

    async fn lrange(
        &self,
        _key: &str,
        _start: isize,
        _stop: isize,
    ) -> alert_kv::Result<Vec<String>> {
        Err(refused())
    }

    async fn ltrim(&self, _key: &str, _start: isize, _stop: isize) -> alert_kv::Result<()> {
        Err(refused())
    }

    async fn keys(&self, _pattern: &str) -> alert_kv::Result<Vec<String>> {
        Err(refused())
    }
}

/// In-memory backend where GET fails for selected keys
pub struct FlakyGetKv {
    pub inner: MemoryKv,
    pub failing: HashSet<String>,
}

#[async_trait]
impl KvStore for FlakyGetKv {
    fn name(&self) -> &'static str {
        "flaky"
    }

    async fn get(&self, key: &str) -> alert_kv::Result<Option<String>> {
        if self.failing.contains(key) {
            return Err(refused());
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> alert_kv::Result<()> {
        self.inner.set(key, value).await
    }

    async fn lpush(&self, key: &str, value: &str) -> alert_kv::Result<u64> {
        self.inner.lpush(key, value).await
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> alert_kv::Result<Vec<String>> {
        self.inner.lrange(key, start, stop).await
    }

    async fn ltrim(&self, key: &str, start: isize, stop: isize) -> alert_kv::Result<()> {
        self.inner.ltrim(key, start, stop).await
    }

    async fn keys(&self, pattern: &str) -> alert_kv::Result<Vec<String>> {
        self.inner.keys(pattern).await
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let body: Value = if body_bytes.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, body)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// POST /api/alerts with an arbitrary body and content type
pub async fn post_alert(
    app: &Router,
    content_type: Option<&str>,
    body: impl Into<Body>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri("/api/alerts");
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    send(app, builder.body(body.into()).unwrap()).await
}

pub async fn post_json(app: &Router, value: Value) -> (StatusCode, Value) {
    post_alert(app, Some("application/json"), value.to_string()).await
}

pub async fn post_text(app: &Router, text: &str) -> (StatusCode, Value) {
    post_alert(app, Some("text/plain"), text.to_string()).await
}
