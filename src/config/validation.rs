//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Validation is a pure
//! function that reports every problem it finds, not just the first.

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{DashboardConfig, StorageKind};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("api.base_url '{0}' is not a valid http(s) URL")]
    InvalidBaseUrl(String),

    #[error("api.timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("status.interval_secs must be greater than zero")]
    ZeroInterval,

    #[error("status service #{0} has an empty id")]
    EmptyServiceId(usize),

    #[error("status service id '{0}' is declared more than once")]
    DuplicateServiceId(String),

    #[error("status service '{id}' path '{path}' must start with '/'")]
    InvalidServicePath { id: String, path: String },

    #[error("session.path is required when session.storage = \"file\"")]
    MissingSessionPath,

    #[error("session.key must not be empty")]
    EmptySessionKey,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a parsed configuration, collecting every violation.
pub fn validate_config(config: &DashboardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.api.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidBaseUrl(config.api.base_url.clone())),
    }

    if config.api.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.status.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }

    let mut seen = HashSet::new();
    for (idx, service) in config.status.services.iter().enumerate() {
        if service.id.trim().is_empty() {
            errors.push(ValidationError::EmptyServiceId(idx));
        } else if !seen.insert(service.id.as_str()) {
            errors.push(ValidationError::DuplicateServiceId(service.id.clone()));
        }
        if !service.path.starts_with('/') {
            errors.push(ValidationError::InvalidServicePath {
                id: service.id.clone(),
                path: service.path.clone(),
            });
        }
    }

    if config.session.storage == StorageKind::File
        && config.session.path.as_deref().map_or(true, |p| p.trim().is_empty())
    {
        errors.push(ValidationError::MissingSessionPath);
    }

    if config.session.key.is_empty() {
        errors.push(ValidationError::EmptySessionKey);
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
