//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (body limit > 0, year level plausible)
//! - Check the bind address parses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BridgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::BridgeConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),

    #[error("max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("allowed_origin must not be empty")]
    EmptyOrigin,

    #[error("year_level {0} is outside the supported range 1..=13")]
    YearLevelOutOfRange(u32),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.cors.allowed_origin.trim().is_empty() {
        errors.push(ValidationError::EmptyOrigin);
    }

    if !(1..=13).contains(&config.classroom.year_level) {
        errors.push(ValidationError::YearLevelOutOfRange(
            config.classroom.year_level,
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&BridgeConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = BridgeConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.listener.max_body_bytes = 0;
        config.cors.allowed_origin = " ".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn rejects_year_level_zero() {
        let mut config = BridgeConfig::default();
        config.classroom.year_level = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::YearLevelOutOfRange(0)));
    }
}
