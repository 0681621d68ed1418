//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::DashboardConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Why a configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Every problem found, not just the first.
    #[error("invalid configuration ({} problem(s)): {}", .0.len(), join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Environment variables that override file values.
pub const ENV_BASE_URL: &str = "DASHBOARD_API_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "DASHBOARD_API_TIMEOUT_MS";
pub const ENV_DEBUG: &str = "DASHBOARD_DEBUG";
pub const ENV_ENVIRONMENT: &str = "DASHBOARD_ENV";

/// Load, override from the process environment, and validate a TOML file.
pub fn load_config(path: &Path) -> Result<DashboardConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: DashboardConfig = toml::from_str(&content)?;
    finish(config)
}

/// Defaults plus environment overrides, validated. Used when no file is given.
pub fn load_default() -> Result<DashboardConfig, ConfigError> {
    finish(DashboardConfig::default())
}

fn finish(mut config: DashboardConfig) -> Result<DashboardConfig, ConfigError> {
    apply_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply overrides looked up through `lookup`.
///
/// Unparseable numeric or boolean values are ignored with a warning; the
/// file value stays in effect.
pub fn apply_overrides<F>(config: &mut DashboardConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_BASE_URL) {
        config.api.base_url = url;
    }

    if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
        match raw.trim().parse() {
            Ok(ms) => config.api.timeout_ms = ms,
            Err(_) => tracing::warn!(var = ENV_TIMEOUT_MS, value = %raw, "Ignoring non-numeric override"),
        }
    }

    if let Some(raw) = lookup(ENV_DEBUG) {
        match raw.trim() {
            "true" | "1" => config.observability.debug = true,
            "false" | "0" => config.observability.debug = false,
            _ => tracing::warn!(var = ENV_DEBUG, value = %raw, "Ignoring non-boolean override"),
        }
    }

    if let Some(env) = lookup(ENV_ENVIRONMENT) {
        config.api.environment = env;
    }
}
