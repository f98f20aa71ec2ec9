//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     definitions loader
//!     → Endpoint per (METHOD, path) with its variants
//!     → Registry (endpoint map frozen from here on)
//!
//! Per request:
//!     (method, path) → key.rs (normalize)
//!     → registry.rs (exact lookup)
//!     → endpoint.rs (current active variant)
//!
//! Per control request:
//!     vary → registry.rs set_active → endpoint.rs atomic swap
//! ```
//!
//! # Design Decisions
//! - Exact matching only: no wildcards, no path parameters
//! - Endpoint map is immutable after load, so lookups take no lock
//! - Each endpoint owns its active pointer; varying one endpoint never
//!   touches another

pub mod endpoint;
pub mod key;
pub mod registry;

pub use endpoint::{ActiveVariant, Endpoint, MissingDefault, DEFAULT_VARIANT};
pub use key::{EndpointKey, EndpointPath, SUPPORTED_METHODS};
pub use registry::{EndpointSummary, Registry, RegistryError, RoutingMiss};
