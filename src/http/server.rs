//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router: control plane route plus mock fallback
//! - Wire up middleware (request ID, tracing, control body limit)
//! - Serve on a bound listener until shutdown

use std::sync::Arc;

use axum::{routing::any, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::config::ErsatzConfig;
use crate::http::control::{control_handler, CONTROL_PATH};
use crate::http::dispatch::dispatch_handler;
use crate::http::request::{make_span, request_id_layer};
use crate::routing::Registry;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
}

/// HTTP server for the mock endpoints and the control plane.
pub struct HttpServer {
    router: Router,
    config: ErsatzConfig,
}

impl HttpServer {
    /// Create a server over a fully loaded registry.
    pub fn new(config: ErsatzConfig, registry: Arc<Registry>) -> Self {
        let state = AppState { registry };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ErsatzConfig, state: AppState) -> Router {
        Router::new()
            .route(
                CONTROL_PATH,
                any(control_handler).layer(RequestBodyLimitLayer::new(config.control.max_body_size)),
            )
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(request_id_layer())
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            definitions = %self.config.definitions.root.display(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
