//! Request dispatch to mock endpoints.

use std::time::Instant;

use axum::extract::State;
use axum::http::{Method, Uri};
use axum::response::Response;

use crate::http::response::{not_found, variant_response};
use crate::http::server::AppState;
use crate::observability::metrics::{self, RequestKind};
use crate::routing::Registry;

/// Fallback handler: every request that is not for the control plane.
pub async fn dispatch_handler(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    dispatch(&state.registry, &method, uri.path())
}

/// Serve the active variant of the endpoint matching `method` and `path`.
pub fn dispatch(registry: &Registry, method: &Method, path: &str) -> Response {
    let start = Instant::now();

    let endpoint = match registry.lookup(method, path) {
        Ok(endpoint) => endpoint,
        Err(miss) => {
            tracing::warn!(endpoint = %miss.0, "No endpoint matched");
            metrics::record_request(method, 404, RequestKind::Miss, start);
            return not_found();
        }
    };

    let active = registry.active_variant(endpoint);
    let response = variant_response(active.variant());

    tracing::debug!(
        endpoint = %endpoint.key(),
        variant = %active.name(),
        status = response.status().as_u16(),
        "Serving variant"
    );
    metrics::record_request(method, response.status().as_u16(), RequestKind::Mock, start);

    response
}
