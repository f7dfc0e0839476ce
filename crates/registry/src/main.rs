//! `student-registry`: service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the tracing pipeline (JSON logs, optional OTLP export).
//! 3. Open the student store: MongoDB (ping + index setup), or in-memory
//!    when `STORE_BACKEND=memory`.
//! 4. Build the Axum router and serve until Ctrl+C / SIGTERM.

mod config;
mod registry;
mod server;
mod store;
mod telemetry;
mod validation;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::signal;
use tracing::{error, info, warn};

use config::{Config, StoreBackend};
use server::state::AppState;
use store::{MemoryStudentStore, MongoStudentStore, StudentStore};

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = cfg.port,
        app_env = %cfg.app_env,
        store_backend = ?cfg.store_backend,
        "student-registry starting"
    );

    // -----------------------------------------------------------------------
    // 3. Storage
    // -----------------------------------------------------------------------
    let store: Arc<dyn StudentStore> = match cfg.store_backend {
        StoreBackend::Mongodb => Arc::new(
            MongoStudentStore::connect(&cfg.mongo_uri, &cfg.mongo_db_name)
                .await
                .inspect_err(|e| error!(error = %e, "MongoDB connection failed"))?,
        ),
        StoreBackend::Memory => {
            warn!("using in-memory student store; records are lost on exit");
            Arc::new(MemoryStudentStore::new())
        }
    };

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(store, cfg.is_development());
    let router = server::router::build(state, Duration::from_secs(cfg.request_timeout_secs));

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    telemetry::shutdown_telemetry();
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
