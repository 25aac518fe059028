//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Reject header values that would break the raw request framing
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DispatcherConfig → Result<(), Vec<ValidationError>>

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::DispatcherConfig;

/// A single semantic problem found in a configuration.
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

/// Validate a parsed configuration.
pub fn validate_config(config: &DispatcherConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let secs = config.timeouts.request_secs;
    if !secs.is_finite() || secs <= 0.0 {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            format!("must be a positive number of seconds, got {}", secs),
        ));
    }

    if config.raw_socket.default_port == 0 {
        errors.push(ValidationError::new("raw_socket.default_port", "must be non-zero"));
    }

    let agent = &config.raw_socket.user_agent;
    if agent.trim().is_empty() {
        errors.push(ValidationError::new("raw_socket.user_agent", "must not be empty"));
    } else if agent.contains('\r') || agent.contains('\n') {
        errors.push(ValidationError::new(
            "raw_socket.user_agent",
            "must not contain line breaks",
        ));
    }

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", obs.metrics_address),
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
    fn test_default_config_is_valid() {
        assert!(validate_config(&DispatcherConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = DispatcherConfig::default();
        config.timeouts.request_secs = 0.0;
        config.raw_socket.default_port = 0;
        config.raw_socket.user_agent = "evil\r\nX-Injected: 1".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].field, "timeouts.request_secs");
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = DispatcherConfig::default();
        config.observability.metrics_address = "nope".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "observability.metrics_address");
    }

    #[test]
    fn test_nan_timeout_rejected() {
        let mut config = DispatcherConfig::default();
        config.timeouts.request_secs = f64::NAN;
        assert!(validate_config(&config).is_err());
    }
}
