use std::env;
use std::str::FromStr;
use std::time::Duration;
use anyhow::{anyhow, Context, Result};

/// Which document store implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Spanner,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "spanner" => Ok(StoreBackend::Spanner),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow!(
                "STORE_BACKEND must be one of: spanner, memory, got '{}'",
                other
            )),
        }
    }
}

/// Connection settings for the Spanner-backed store
#[derive(Debug, Clone)]
pub struct SpannerConfig {
    pub emulator_host: Option<String>,
    pub project: String,
    pub instance: String,
    pub database: String,
}

impl SpannerConfig {
    fn from_env() -> Result<Self> {
        let emulator_host = env::var("SPANNER_EMULATOR_HOST").ok();

        let project = env::var("SPANNER_PROJECT")
            .context("SPANNER_PROJECT environment variable is required")?;

        let instance = env::var("SPANNER_INSTANCE")
            .context("SPANNER_INSTANCE environment variable is required")?;

        let database = env::var("SPANNER_DATABASE")
            .context("SPANNER_DATABASE environment variable is required")?;

        Ok(SpannerConfig {
            emulator_host,
            project,
            instance,
            database,
        })
    }

    pub fn database_path(&self) -> String {
        format!(
            "projects/{}/instances/{}/databases/{}",
            self.project, self.instance, self.database
        )
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    /// Present only when `store_backend` is `Spanner`
    pub spanner: Option<SpannerConfig>,
    pub service_port: u16,
    pub service_host: String,
    pub store_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let store_backend = env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "spanner".to_string())
            .parse::<StoreBackend>()?;

        let spanner = match store_backend {
            StoreBackend::Spanner => Some(SpannerConfig::from_env()?),
            StoreBackend::Memory => None,
        };

        let service_port = env::var("SERVICE_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = env::var("SERVICE_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string());

        let timeout_ms = env::var("STORE_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u64>()
            .context("STORE_TIMEOUT_MS must be a positive number of milliseconds")?;
        if timeout_ms == 0 {
            return Err(anyhow!("STORE_TIMEOUT_MS must be greater than zero"));
        }

        Ok(Config {
            store_backend,
            spanner,
            service_port,
            service_host,
            store_timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// In-memory configuration used by handler tests
    #[cfg(test)]
    pub fn for_memory_store() -> Self {
        Config {
            store_backend: StoreBackend::Memory,
            spanner: None,
            service_port: 5000,
            service_host: "0.0.0.0".to_string(),
            store_timeout: Duration::from_millis(5000),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service_host, self.service_port)
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Store backend: {:?}", self.store_backend);
        if let Some(spanner) = &self.spanner {
            tracing::info!("  Spanner emulator: {}",
                spanner.emulator_host.as_deref().unwrap_or("disabled (using production)"));
            tracing::info!("  Spanner project: {}", spanner.project);
            tracing::info!("  Spanner instance: {}", spanner.instance);
            tracing::info!("  Spanner database: {}", spanner.database);
        }
        tracing::info!("  Store call timeout: {:?}", self.store_timeout);
        tracing::info!("  Service listening on: {}", self.bind_address());
    }
}
