//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and value ranges
//! - Detect conflicting listeners
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Pure function: &ErsatzConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use crate::config::schema::ErsatzConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },
    #[error("definitions.root must be set")]
    MissingDefinitionsRoot,
    #[error("control.max_body_size must be greater than zero")]
    ZeroBodyLimit,
    #[error("observability.log_level: unknown level {0:?}")]
    UnknownLogLevel(String),
    #[error("admin.api_key must be set when the admin API is enabled")]
    MissingApiKey,
    #[error("{0} and listener.bind_address must differ")]
    AddressConflict(&'static str),
}

pub fn validate_config(config: &ErsatzConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let listener = parse_addr("listener.bind_address", &config.listener.bind_address, &mut errors);

    if config.definitions.root.as_os_str().is_empty() {
        errors.push(ValidationError::MissingDefinitionsRoot);
    }

    if config.control.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.observability.log_level.clone()));
    }

    if config.observability.metrics_enabled {
        let metrics = parse_addr(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
        if metrics.is_some() && metrics == listener {
            errors.push(ValidationError::AddressConflict("observability.metrics_address"));
        }
    }

    if config.admin.enabled {
        if config.admin.api_key.is_empty() {
            errors.push(ValidationError::MissingApiKey);
        }
        let admin = parse_addr("admin.bind_address", &config.admin.bind_address, &mut errors);
        if admin.is_some() && admin == listener {
            errors.push(ValidationError::AddressConflict("admin.bind_address"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn parse_addr(
    field: &'static str,
    value: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<SocketAddr> {
    match value.parse() {
        Ok(addr) => Some(addr),
        Err(_) => {
            errors.push(ValidationError::InvalidAddress {
                field,
                value: value.to_string(),
            });
            None
        }
    }
}
