//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the definition tree into a registry
//! - Start the metrics exporter when enabled
//! - Bind listeners and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listeners bind last (traffic only when the registry is complete)

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::admin::{serve_admin, AdminState};
use crate::config::ErsatzConfig;
use crate::definitions::{load_dir, LoadError};
use crate::http::HttpServer;
use crate::lifecycle::{shutdown::Shutdown, signals::wait_for_signal};
use crate::observability::metrics;
use crate::routing::Registry;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Definitions(#[from] LoadError),
    #[error("invalid address {0:?}")]
    Address(String),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Bind a TCP listener on a configured address.
pub async fn bind(address: &str) -> Result<TcpListener, StartupError> {
    let addr: SocketAddr = address
        .parse()
        .map_err(|_| StartupError::Address(address.to_string()))?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    tracing::info!(address = %addr, "Listener bound");
    Ok(listener)
}

/// Start serving a validated configuration until a shutdown signal arrives.
pub async fn run(config: ErsatzConfig) -> Result<(), StartupError> {
    let shutdown = Shutdown::new();

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_shutdown.trigger();
    });

    serve(config, shutdown).await
}

/// Load definitions, bind and serve until `shutdown` is triggered.
pub async fn serve(config: ErsatzConfig, shutdown: Shutdown) -> Result<(), StartupError> {
    // 1. Registry, fully built before anything listens
    let registry: Arc<Registry> = Arc::new(load_dir(&config.definitions.root)?);

    // 2. Metrics
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::Address(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    // 3. Admin API
    if config.admin.enabled {
        let listener = bind(&config.admin.bind_address).await?;
        let state = AdminState {
            registry: Arc::clone(&registry),
            api_key: Arc::from(config.admin.api_key.as_str()),
        };
        let admin_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            if let Err(e) = serve_admin(listener, state, admin_shutdown).await {
                tracing::error!(error = %e, "Admin API stopped");
            }
        });
    }

    // 4. Mock server
    let listener = bind(&config.listener.bind_address).await?;
    let server_shutdown = shutdown.subscribe();
    HttpServer::new(config, registry)
        .run(listener, server_shutdown)
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!("Shutdown complete");
    Ok(())
}
