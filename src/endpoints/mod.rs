//! Endpoint catalog.
//!
//! Logical operation names mapped to backend URL templates. Pure data;
//! callers render a concrete path with [`Endpoint::path`].
//!
//! Identifiers are percent-encoded into exactly one path segment, so an id
//! containing `/` or `?` cannot address a different resource.

use std::borrow::Cow;
use std::fmt;

/// Logical name → URL template. `{id}` and `{service}` are placeholders.
pub const CATALOG: &[(&str, &str)] = &[
    ("auth.login", "/auth/login"),
    ("auth.register", "/auth/register"),
    ("auth.logout", "/auth/logout"),
    ("auth.validate", "/auth/validate"),
    ("auth.refresh", "/auth/refresh"),
    ("auth.me", "/auth/me"),
    ("users.list", "/users"),
    ("users.create", "/users"),
    ("users.details", "/users/{id}"),
    ("users.update", "/users/{id}"),
    ("users.delete", "/users/{id}"),
    ("users.status", "/users/{id}/status"),
    ("roles.list", "/roles"),
    ("roles.create", "/roles"),
    ("roles.details", "/roles/{id}"),
    ("roles.update", "/roles/{id}"),
    ("roles.delete", "/roles/{id}"),
    ("health.gateway", "/actuator/health"),
    ("health.service", "/{service}/actuator/health"),
    ("sync.status", "/{service}/api/sync/status"),
];

/// Look up the URL template for a logical operation name.
pub fn template(name: &str) -> Option<&'static str> {
    CATALOG
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, template)| *template)
}

/// A concrete endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Register,
    Logout,
    Validate,
    Refresh,
    CurrentUser,
    Users,
    /// Backend identifiers are UUID strings.
    User(String),
    UserStatus(String),
    Roles,
    Role(String),
    GatewayHealth,
    /// Health of a sub-service routed under its own prefix (e.g. "sync-a").
    ServiceHealth(String),
    SyncStatus(String),
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::Login => "/auth/login".to_string(),
            Endpoint::Register => "/auth/register".to_string(),
            Endpoint::Logout => "/auth/logout".to_string(),
            Endpoint::Validate => "/auth/validate".to_string(),
            Endpoint::Refresh => "/auth/refresh".to_string(),
            Endpoint::CurrentUser => "/auth/me".to_string(),
            Endpoint::Users => "/users".to_string(),
            Endpoint::User(id) => format!("/users/{}", segment(id)),
            Endpoint::UserStatus(id) => format!("/users/{}/status", segment(id)),
            Endpoint::Roles => "/roles".to_string(),
            Endpoint::Role(id) => format!("/roles/{}", segment(id)),
            Endpoint::GatewayHealth => "/actuator/health".to_string(),
            Endpoint::ServiceHealth(service) => format!("/{}/actuator/health", segment(service)),
            Endpoint::SyncStatus(service) => format!("/{}/api/sync/status", segment(service)),
        }
    }
}

fn segment(raw: &str) -> Cow<'_, str> {
    urlencoding::encode(raw)
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
