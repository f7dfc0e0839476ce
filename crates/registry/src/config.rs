//! Configuration loading and validation for the registry service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Which [`StudentStore`](crate::store::StudentStore) backs the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Mongodb,
    /// Process-local and unpersisted; for local runs.
    Memory,
}

/// Validated registry service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Storage backend.
    #[serde(default = "default_store_backend")]
    pub store_backend: StoreBackend,

    /// MongoDB connection string. **Required** for the `mongodb` backend.
    #[serde(default)]
    pub mongo_uri: String,

    /// Database used when the connection string does not name one.
    #[serde(default = "default_mongo_db_name")]
    pub mongo_db_name: String,

    /// Deployment environment. `"development"` exposes internal error detail
    /// in 500 responses.
    #[serde(default = "default_app_env")]
    pub app_env: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Per-request timeout enforced by the HTTP layer.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// OTLP collector endpoint. Span export is disabled when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,
}

fn default_port() -> u16 {
    5000
}
fn default_store_backend() -> StoreBackend {
    StoreBackend::Mongodb
}
fn default_mongo_db_name() -> String {
    "student_registry".into()
}
fn default_app_env() -> String {
    "production".into()
}
fn default_log_level() -> String {
    "info".into()
}
fn default_request_timeout() -> u64 {
    30
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Whether internal error detail may be returned to callers.
    pub fn is_development(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("development")
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.store_backend == StoreBackend::Mongodb {
            ensure_non_empty(&self.mongo_uri, "MONGO_URI")?;
            ensure_non_empty(&self.mongo_db_name, "MONGO_DB_NAME")?;

            if !(self.mongo_uri.starts_with("mongodb://")
                || self.mongo_uri.starts_with("mongodb+srv://"))
            {
                anyhow::bail!("MONGO_URI must start with mongodb:// or mongodb+srv://");
            }
        }
        if self.port == 0 {
            anyhow::bail!("PORT must be > 0");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be > 0");
        }
        if let Some(endpoint) = &self.otel_exporter_otlp_endpoint {
            ensure_non_empty(endpoint, "OTEL_EXPORTER_OTLP_ENDPOINT")?;
        }
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
