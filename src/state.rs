use crate::config::Config;
use crate::error::ApiError;
use crate::store::DocumentStore;
use std::future::Future;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Await one store operation, bounded by the configured timeout
    pub async fn store_call<T, F>(&self, operation: &'static str, call: F) -> Result<T, ApiError>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        match tokio::time::timeout(self.config.store_timeout, call).await {
            Ok(result) => result.map_err(ApiError::from),
            Err(_) => Err(ApiError::StoreTimeout(operation)),
        }
    }
}
