//! Client core for the user-management admin dashboard.
//!
//! An explicitly constructed [`ApiClient`] attaches the stored bearer
//! credential and diagnostic headers to every call and turns every failure
//! into a [`NormalizedError`]. The [`StatusPoller`] reuses it to check backend
//! health on a fixed interval.

pub mod api;
pub mod auth;
pub mod config;
pub mod endpoints;
pub mod errors;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::DashboardConfig;
pub use errors::{ErrorKind, NormalizedError};
pub use health::StatusPoller;
pub use http::{ApiClient, SessionEvent};
