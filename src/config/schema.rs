//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dashboard
//! client. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the dashboard client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DashboardConfig {
    /// Backend API settings (base URL, timeout, diagnostic headers).
    pub api: ApiConfig,

    /// Where the bearer credential is kept.
    pub session: SessionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// System status polling.
    pub status: StatusConfig,
}

/// Backend API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every request path is joined onto (e.g., "http://localhost:8080").
    pub base_url: String,

    /// Request timeout in milliseconds.
    pub timeout_ms: u64,

    /// Value of the `X-Frontend-Request` header.
    pub client_name: String,

    /// Value of the `X-Frontend-Version` header.
    pub client_version: String,

    /// Deployment label attached to diagnostics (development, staging, ...).
    pub environment: String,

    /// Sign-in entry point announced to callers after a 401.
    pub sign_in_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_ms: 10_000,
            client_name: "dashboard-client".to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
            sign_in_path: "/auth/jwt/sign-in".to_string(),
        }
    }
}

/// Credential storage lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Lives as long as the process.
    #[default]
    Memory,
    /// Persisted to a file and reloaded on the next start.
    File,
}

/// Session (credential storage) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    pub storage: StorageKind,

    /// Path of the durable store. Required when `storage = "file"`.
    pub path: Option<String>,

    /// Well-known key the credential is stored under.
    pub key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage: StorageKind::Memory,
            path: None,
            key: "accessToken".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Report every dispatch and its outcome to the log.
    pub debug: bool,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            debug: true,
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Status polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Seconds between the start of two polling cycles.
    pub interval_secs: u64,

    /// Services probed on every cycle.
    pub services: Vec<ServiceConfig>,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            services: vec![
                ServiceConfig::new("api-gateway", "API Gateway", "/actuator/health"),
                ServiceConfig::new(
                    "user-management",
                    "User Management Service",
                    "/users/actuator/health",
                ),
                ServiceConfig::new("sync-a", "Database Sync Service A", "/sync-a/actuator/health"),
                ServiceConfig::new("sync-b", "Database Sync Service B", "/sync-b/actuator/health"),
                ServiceConfig::new("sync-c", "Database Sync Service C", "/sync-c/actuator/health"),
            ],
        }
    }
}

/// A single service probed by the status poller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Unique service identifier (key of the health record mapping).
    pub id: String,

    /// Human-readable name.
    pub name: String,

    /// Health endpoint path, relative to the API base URL.
    pub path: String,
}

impl ServiceConfig {
    pub fn new(id: &str, name: &str, path: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            path: path.to_string(),
        }
    }
}
