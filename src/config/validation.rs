//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals and timeouts > 0)
//! - Check that URLs and addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SlackinConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use secrecy::ExposeSecret;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::SlackinConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("slack.token must not be empty")]
    MissingToken,

    #[error("slack.subdomain must not be empty")]
    MissingSubdomain,

    #[error("slack.base_url '{0}' is not a valid URL")]
    InvalidBaseUrl(String),

    #[error("slack.channels contains an empty channel name")]
    EmptyChannel,

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a fully merged configuration.
pub fn validate_config(config: &SlackinConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.slack.token.expose_secret().trim().is_empty() {
        errors.push(ValidationError::MissingToken);
    }
    if config.slack.subdomain.trim().is_empty() {
        errors.push(ValidationError::MissingSubdomain);
    }
    if url::Url::parse(&config.slack.base_url).is_err() {
        errors.push(ValidationError::InvalidBaseUrl(config.slack.base_url.clone()));
    }
    if config.slack.channels.iter().any(|c| c.trim().is_empty()) {
        errors.push(ValidationError::EmptyChannel);
    }
    if config.slack.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero("slack.request_timeout_secs"));
    }
    if config.refresh.interval_ms == 0 {
        errors.push(ValidationError::Zero("refresh.interval_ms"));
    }
    if config.refresh.fetch_timeout_secs == 0 {
        errors.push(ValidationError::Zero("refresh.fetch_timeout_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
