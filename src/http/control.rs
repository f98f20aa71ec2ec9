//! Control plane.
//!
//! # Responsibilities
//! - Accept commands on `POST /__ersatz`
//! - Decode the command and apply it to the registry
//! - Answer 200 once the change is committed, 400 otherwise
//!
//! # Design Decisions
//! - Commands are a tagged enum on the `command` field; adding a command
//!   means adding a variant and a match arm
//! - Stateless: each control request stands alone

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::http::response::bad_request;
use crate::http::server::AppState;
use crate::observability::metrics::{self, RequestKind};
use crate::routing::{EndpointKey, Registry, RegistryError};

/// Reserved path of the control endpoint.
pub const CONTROL_PATH: &str = "/__ersatz";

/// Target of a command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EndpointRef {
    pub url: String,
    pub method: String,
}

/// A control command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ServerCommand {
    /// Make `variant` the active variant of `endpoint`.
    Vary { endpoint: EndpointRef, variant: String },
}

/// Reasons a control request is rejected. All map to 400.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("control requests must use POST, got {0}")]
    MethodNotAllowed(Method),
    #[error("malformed command: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid method token {0:?}")]
    InvalidMethod(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl IntoResponse for ControlError {
    fn into_response(self) -> Response {
        bad_request(self.to_string())
    }
}

/// Decode and apply one control request.
pub fn handle(registry: &Registry, method: &Method, body: &[u8]) -> Result<(), ControlError> {
    if *method != Method::POST {
        return Err(ControlError::MethodNotAllowed(method.clone()));
    }
    let command: ServerCommand = serde_json::from_slice(body)?;
    apply(registry, command)
}

/// Apply a decoded command to the registry.
pub fn apply(registry: &Registry, command: ServerCommand) -> Result<(), ControlError> {
    match command {
        ServerCommand::Vary { endpoint, variant } => {
            let key = EndpointKey::parse(&endpoint.method, &endpoint.url)
                .ok_or(ControlError::InvalidMethod(endpoint.method))?;
            let previous = registry.set_active(&key, &variant)?;
            tracing::info!(
                endpoint = %key,
                from = %previous.name(),
                to = %variant,
                "Active variant changed"
            );
            Ok(())
        }
    }
}

pub async fn control_handler(State(state): State<AppState>, method: Method, body: Bytes) -> Response {
    let start = Instant::now();

    let response = match handle(&state.registry, &method, &body) {
        Ok(()) => {
            metrics::record_variant_change("applied");
            StatusCode::OK.into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Control request rejected");
            metrics::record_variant_change("rejected");
            e.into_response()
        }
    };

    metrics::record_request(&method, response.status().as_u16(), RequestKind::Control, start);
    response
}
