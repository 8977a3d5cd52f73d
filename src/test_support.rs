//! Shared fixtures for router-level tests.

use crate::app::build_router;
use crate::config::Config;
use crate::state::AppState;
use crate::store::{Document, DocumentStore, MemoryStore};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response, Router};
use serde_json::Value as JsonValue;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tower::ServiceExt;

// Tests that touch process-wide environment variables hold this lock
static ENV_LOCK: Mutex<()> = Mutex::new(());

pub fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

pub fn setup_test_app() -> Router {
    app_with_store(Arc::new(MemoryStore::new()), Config::for_memory_store())
}

pub fn app_with_store(store: Arc<dyn DocumentStore>, config: Config) -> Router {
    build_router(AppState::new(store, config))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: &JsonValue) -> Request<Body> {
    post_raw(uri, serde_json::to_string(body).unwrap())
}

pub fn post_raw(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub async fn read_json(response: Response) -> JsonValue {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Store whose every operation fails, as an unreachable backend would
pub struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get(&self, _: &str, _: &str) -> Result<Option<Document>> {
        Err(anyhow!("spanner: transport error at 10.1.2.3:9010"))
    }

    async fn set(&self, _: &str, _: &str, _: Document) -> Result<()> {
        Err(anyhow!("spanner: transport error at 10.1.2.3:9010"))
    }

    async fn list_children(&self, _: &str, _: &str, _: &str) -> Result<Vec<Document>> {
        Err(anyhow!("spanner: transport error at 10.1.2.3:9010"))
    }

    async fn create_child(&self, _: &str, _: &str, _: &str, _: Document) -> Result<String> {
        Err(anyhow!("spanner: transport error at 10.1.2.3:9010"))
    }

    async fn delete_child(&self, _: &str, _: &str, _: &str, _: &str) -> Result<()> {
        Err(anyhow!("spanner: transport error at 10.1.2.3:9010"))
    }

    async fn health_check(&self) -> Result<()> {
        Err(anyhow!("spanner: transport error at 10.1.2.3:9010"))
    }
}

/// Store that never answers within any reasonable timeout
pub struct StalledStore;

impl StalledStore {
    async fn stall() {
        tokio::time::sleep(Duration::from_secs(60)).await;
    }
}

#[async_trait]
impl DocumentStore for StalledStore {
    async fn get(&self, _: &str, _: &str) -> Result<Option<Document>> {
        Self::stall().await;
        Ok(None)
    }

    async fn set(&self, _: &str, _: &str, _: Document) -> Result<()> {
        Self::stall().await;
        Ok(())
    }

    async fn list_children(&self, _: &str, _: &str, _: &str) -> Result<Vec<Document>> {
        Self::stall().await;
        Ok(Vec::new())
    }

    async fn create_child(&self, _: &str, _: &str, _: &str, _: Document) -> Result<String> {
        Self::stall().await;
        Ok(String::new())
    }

    async fn delete_child(&self, _: &str, _: &str, _: &str, _: &str) -> Result<()> {
        Self::stall().await;
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        Self::stall().await;
        Ok(())
    }
}

pub fn stalled_app() -> Router {
    let config = Config {
        store_timeout: Duration::from_millis(20),
        ..Config::for_memory_store()
    };
    app_with_store(Arc::new(StalledStore), config)
}

pub fn failing_app() -> Router {
    app_with_store(Arc::new(FailingStore), Config::for_memory_store())
}
