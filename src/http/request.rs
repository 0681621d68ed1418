//! Request descriptors.
//!
//! A descriptor is built per call by the caller and decorated by the client
//! (credential, diagnostic headers, request ID) just before dispatch.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ErrorKind, NormalizedError};

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_REQUEST_ID: &str = "X-Request-Id";
pub const HEADER_CLIENT_NAME: &str = "X-Frontend-Request";
pub const HEADER_CLIENT_VERSION: &str = "X-Frontend-Version";
pub const HEADER_REQUESTED_WITH: &str = "X-Requested-With";
pub const REQUESTED_WITH_SCRIPT: &str = "XMLHttpRequest";

/// Standard HTTP verbs accepted by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
        }
    }
}

/// A single API call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path relative to the configured base URL.
    pub path: String,
    /// Query parameters, appended form-encoded in insertion order.
    pub query: Vec<(String, String)>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
    /// Overrides the client's configured timeout.
    pub timeout: Option<Duration>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: BTreeMap::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `body` as the JSON request body.
    pub fn with_json<T: Serialize>(self, body: &T) -> Result<Self, NormalizedError> {
        let value = serde_json::to_value(body).map_err(|e| {
            NormalizedError::new(
                ErrorKind::Unknown,
                format!("Could not encode request body: {}", e),
            )
        })?;
        Ok(self.with_body(value))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Remove every header named `name`, ignoring case.
    pub(crate) fn remove_header(&mut self, name: &str) {
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let req = RequestDescriptor::post("/roles")
            .with_header("X-Trace", "1")
            .with_body(json!({"name": "ADMIN"}))
            .with_timeout(Duration::from_secs(2));

        assert_eq!(req.method, Method::Post);
        assert_eq!(req.header("x-trace"), Some("1"));
        assert_eq!(req.body, Some(json!({"name": "ADMIN"})));
        assert_eq!(req.timeout, Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_remove_header_ignores_case() {
        let mut req = RequestDescriptor::get("/users").with_header("authorization", "Basic x");
        req.remove_header(HEADER_AUTHORIZATION);
        assert!(req.headers.is_empty());
    }

    #[test]
    fn test_method_names() {
        assert_eq!(Method::Delete.to_string(), "DELETE");
        assert_eq!(reqwest::Method::from(Method::Patch), reqwest::Method::PATCH);
    }
}
