//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → CLI overrides (port, definitions root, host)
//!     → validation.rs (semantic checks)
//!     → ErsatzConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults so a server can start from the CLI alone
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AdminConfig, ControlConfig, DefinitionsConfig, ErsatzConfig, ListenerConfig, LogFormat,
    ObservabilityConfig,
};
pub use validation::{validate_config, ValidationError};
