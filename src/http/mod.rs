//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (axum/hyper, one task per connection)
//!     → request.rs (assign request ID, open trace span)
//!     → server.rs (route)
//!         /__ersatz  → control.rs (decode command → Registry::set_active)
//!         otherwise → dispatch.rs (Registry::lookup → active variant)
//!     → response.rs (variant → status, headers, JSON body)
//!     → Send to client
//! ```

pub mod control;
pub mod dispatch;
pub mod request;
pub mod response;
pub mod server;

pub use control::{ControlError, EndpointRef, ServerCommand, CONTROL_PATH};
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
