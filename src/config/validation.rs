//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (tries >= 1, timeouts > 0)
//! - Check that capped backoff has a usable ceiling
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is turned into a transport

use std::fmt;

use crate::config::schema::{BackoffKind, ClientConfig};

/// A single semantic problem in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.retries.max_tries == 0 {
        errors.push(ValidationError::new(
            "retries.max_tries",
            "must be at least 1",
        ));
    }

    if config.retries.backoff != BackoffKind::None && config.retries.base_delay_ms == 0 {
        errors.push(ValidationError::new(
            "retries.base_delay_ms",
            "must be greater than zero when backoff is enabled",
        ));
    }

    if config.retries.backoff == BackoffKind::CappedJitter
        && config.retries.max_delay_ms < config.retries.base_delay_ms
    {
        errors.push(ValidationError::new(
            "retries.max_delay_ms",
            format!(
                "must not be below base_delay_ms ({})",
                config.retries.base_delay_ms
            ),
        ));
    }

    if config.timeouts.dial_ms == 0 {
        errors.push(ValidationError::new("timeouts.dial_ms", "must be greater than zero"));
    }

    if config.timeouts.deadline_ms == 0 {
        errors.push(ValidationError::new(
            "timeouts.deadline_ms",
            "must be greater than zero",
        ));
    }

    if config.observability.log_level.trim().is_empty() {
        errors.push(ValidationError::new(
            "observability.log_level",
            "must not be empty",
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
    fn defaults_are_valid() {
        assert!(validate_config(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn reports_every_problem() {
        let mut config = ClientConfig::default();
        config.retries.max_tries = 0;
        config.timeouts.dial_ms = 0;
        config.timeouts.deadline_ms = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();

        assert_eq!(
            fields,
            ["retries.max_tries", "timeouts.dial_ms", "timeouts.deadline_ms"]
        );
    }

    #[test]
    fn capped_jitter_needs_ceiling_above_base() {
        let mut config = ClientConfig::default();
        config.retries.backoff = BackoffKind::CappedJitter;
        config.retries.base_delay_ms = 500;
        config.retries.max_delay_ms = 100;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "retries.max_delay_ms");
        assert!(errors[0].to_string().contains("500"));
    }

    #[test]
    fn zero_base_is_fine_without_backoff() {
        let mut config = ClientConfig::default();
        config.retries.backoff = BackoffKind::None;
        config.retries.base_delay_ms = 0;

        assert!(validate_config(&config).is_ok());
    }
}
