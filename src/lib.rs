//! Ersatz: a file-defined mock HTTP server.
//!
//! Endpoints are described as a directory tree of JSON response
//! definitions. The server replays the active variant of each endpoint and
//! lets tests switch variants at runtime through `POST /__ersatz`.

pub mod admin;
pub mod config;
pub mod definitions;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::ErsatzConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::Registry;
