//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ErsatzConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read a TOML configuration file.
///
/// The result is not validated yet: CLI overrides are applied on top of it
/// first, then the merged config goes through `validate_config`.
pub fn load_config(path: &Path) -> Result<ErsatzConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ErsatzConfig = toml::from_str(&content)?;
    Ok(config)
}
