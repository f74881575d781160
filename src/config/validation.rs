//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0)
//! - Check that routes are absolute and do not collide
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use url::Url;

use crate::config::schema::ClientConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `transport.timeout_ms`.
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

impl std::error::Error for ValidationError {}

pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.transport.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "transport.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "transport.base_url",
            format!("invalid URL '{}': {}", config.transport.base_url, e),
        )),
    }

    if config.transport.timeout_ms == 0 {
        errors.push(ValidationError::new("transport.timeout_ms", "must be greater than 0"));
    }

    let nav = &config.navigation;
    if nav.redirect_delay_ms == 0 {
        errors.push(ValidationError::new("navigation.redirect_delay_ms", "must be greater than 0"));
    }

    let routes = [
        ("navigation.login_route", nav.login_route.as_str()),
        ("navigation.callback_route", nav.callback_route.as_str()),
        ("navigation.error_route_prefix", nav.error_route_prefix.as_str()),
    ];
    for (field, route) in routes {
        if !route.starts_with('/') {
            errors.push(ValidationError::new(field, format!("route '{}' must start with '/'", route)));
        }
    }
    for (i, (field_a, a)) in routes.iter().enumerate() {
        for (field_b, b) in routes.iter().skip(i + 1) {
            if a.trim_end_matches('/') == b.trim_end_matches('/') {
                errors.push(ValidationError::new(
                    *field_b,
                    format!("route '{}' collides with {}", b, field_a),
                ));
            }
        }
    }

    for (name, message) in config.messages.entries() {
        if message.trim().is_empty() {
            errors.push(ValidationError::new(format!("messages.{}", name), "must not be empty"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
