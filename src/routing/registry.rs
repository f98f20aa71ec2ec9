//! Endpoint lookup and active-variant switching.
//!
//! # Responsibilities
//! - Own every endpoint loaded from the definition tree
//! - Look up the endpoint for an inbound method and path
//! - Switch an endpoint's active variant on behalf of the control plane
//!
//! # Design Decisions
//! - Endpoint map frozen after construction (shared via `Arc`, no lock)
//! - Per-endpoint atomic pointer for the active variant
//! - Explicit `RoutingMiss` rather than a silent fallback

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::Method;
use serde::Serialize;

use crate::definitions::Variant;
use crate::routing::endpoint::{ActiveVariant, Endpoint};
use crate::routing::key::{EndpointKey, EndpointPath};

/// No endpoint exists for the requested method and path.
#[derive(Debug, thiserror::Error)]
#[error("no endpoint for {0}")]
pub struct RoutingMiss(pub EndpointKey);

/// Rejected `set_active` calls.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown endpoint {0}")]
    UnknownEndpoint(EndpointKey),
    #[error("endpoint {key} has no variant {variant:?}")]
    UnknownVariant { key: EndpointKey, variant: String },
}

/// Read-only view of one endpoint, used for introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointSummary {
    pub method: String,
    pub url: String,
    pub variants: Vec<String>,
    pub active: String,
}

/// The routing table.
#[derive(Debug, Default)]
pub struct Registry {
    endpoints: HashMap<EndpointKey, Endpoint>,
}

impl Registry {
    /// Build a registry from fully constructed endpoints.
    pub fn new(endpoints: impl IntoIterator<Item = Endpoint>) -> Self {
        Self {
            endpoints: endpoints
                .into_iter()
                .map(|e| (e.key().clone(), e))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Find the endpoint for an inbound request. Exact match only.
    pub fn lookup(&self, method: &Method, path: &str) -> Result<&Endpoint, RoutingMiss> {
        let key = EndpointKey::new(method.clone(), EndpointPath::parse(path));
        match self.endpoints.get(&key) {
            Some(endpoint) => Ok(endpoint),
            None => Err(RoutingMiss(key)),
        }
    }

    /// The variant currently served for `endpoint`.
    pub fn active_variant(&self, endpoint: &Endpoint) -> Arc<ActiveVariant> {
        endpoint.active()
    }

    /// Make `variant` the active variant of `key`.
    ///
    /// On success the change is committed before this returns; the variant
    /// that was replaced is handed back.
    pub fn set_active(
        &self,
        key: &EndpointKey,
        variant: &str,
    ) -> Result<Arc<ActiveVariant>, RegistryError> {
        let endpoint = self
            .endpoints
            .get(key)
            .ok_or_else(|| RegistryError::UnknownEndpoint(key.clone()))?;

        endpoint
            .activate(variant)
            .ok_or_else(|| RegistryError::UnknownVariant {
                key: key.clone(),
                variant: variant.to_string(),
            })
    }

    /// Convenience for tests and tooling: the active variant of `key`.
    pub fn active_for(&self, key: &EndpointKey) -> Option<Arc<ActiveVariant>> {
        self.endpoints.get(key).map(Endpoint::active)
    }

    /// Look up a specific variant of an endpoint.
    pub fn variant(&self, key: &EndpointKey, name: &str) -> Option<&Variant> {
        self.endpoints.get(key).and_then(|e| e.variant(name))
    }

    /// Every endpoint with its variants and active variant, sorted by path
    /// then method.
    pub fn snapshot(&self) -> Vec<EndpointSummary> {
        let mut endpoints: Vec<&Endpoint> = self.endpoints.values().collect();
        endpoints.sort_by(|a, b| {
            (&a.key().path, a.key().method.as_str()).cmp(&(&b.key().path, b.key().method.as_str()))
        });

        endpoints
            .into_iter()
            .map(|e| EndpointSummary {
                method: e.key().method.to_string(),
                url: e.key().path.to_string(),
                variants: e.variant_names().map(str::to_string).collect(),
                active: e.active().name().to_string(),
            })
            .collect()
    }
}
