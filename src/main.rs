mod api_doc;
mod app;
mod config;
mod error;
mod handlers;
mod models;
mod routes;
mod spanner;
mod state;
mod store;
#[cfg(test)]
mod test_support;

use anyhow::Context;
use config::{Config, StoreBackend};
use spanner::SpannerStore;
use state::AppState;
use std::sync::Arc;
use store::{DocumentStore, MemoryStore};
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal outside local development
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("preference-service starting");

    let config = Config::from_env()?;
    config.log_startup();

    let store = connect_store(&config).await?;
    let address = config.bind_address();
    let app = app::build_router(AppState::new(store, config));

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!("Server running on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shut down");
    Ok(())
}

/// Build the single store handle shared by every request
async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match (config.store_backend, &config.spanner) {
        (StoreBackend::Spanner, Some(spanner_config)) => {
            Ok(Arc::new(SpannerStore::from_config(spanner_config).await?))
        }
        (StoreBackend::Spanner, None) => {
            Err(anyhow::anyhow!("Spanner backend selected without Spanner configuration"))
        }
        (StoreBackend::Memory, _) => {
            tracing::warn!("Using in-memory document store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
