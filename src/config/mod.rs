//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (DASHBOARD_*)
//!     → validation.rs (semantic checks)
//!     → DashboardConfig (validated, immutable)
//!     → handed to ApiClient, token store and status poller at construction
//! ```
//!
//! # Design Decisions
//! - Config is supplied from outside; nothing here is computed at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_default, ConfigError};
pub use schema::{
    ApiConfig, DashboardConfig, ObservabilityConfig, ServiceConfig, SessionConfig, StatusConfig,
    StorageKind,
};
