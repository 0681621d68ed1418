//! Normalized error representation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure taxonomy surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Transport failure, no response received.
    Network,
    /// Transport failure attributed to a cross-origin rejection.
    CrossOrigin,
    Unauthorized,
    Forbidden,
    ServerFault,
    /// Request rejected with field-level detail.
    Validation,
    Unknown,
}

impl ErrorKind {
    /// Classify an HTTP status code.
    ///
    /// `has_validation_details` only matters for 400.
    pub fn from_status(status: u16, has_validation_details: bool) -> Self {
        match status {
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            400 if has_validation_details => ErrorKind::Validation,
            s if s >= 500 => ErrorKind::ServerFault,
            _ => ErrorKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::CrossOrigin => "cross_origin",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::ServerFault => "server_fault",
            ErrorKind::Validation => "validation",
            ErrorKind::Unknown => "unknown",
        }
    }
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

/// The single error shape every failed call converges to.
///
/// Built once per failed dispatch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{human_message}")]
pub struct NormalizedError {
    pub human_message: String,
    pub kind: ErrorKind,
    pub status_code: Option<u16>,
    /// Backend machine-readable code, when the body carried one.
    pub error_code: Option<String>,
    pub validation_details: Vec<ValidationDetail>,
    pub suggestion: Option<String>,
    /// Ordered remediation hints.
    pub remediation: Vec<String>,
}

impl NormalizedError {
    pub fn new(kind: ErrorKind, human_message: impl Into<String>) -> Self {
        Self {
            human_message: human_message.into(),
            kind,
            status_code: None,
            error_code: None,
            validation_details: Vec::new(),
            suggestion: None,
            remediation: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(ErrorKind::from_status(401, false), ErrorKind::Unauthorized);
        assert_eq!(ErrorKind::from_status(403, true), ErrorKind::Forbidden);
        assert_eq!(ErrorKind::from_status(400, true), ErrorKind::Validation);
        assert_eq!(ErrorKind::from_status(400, false), ErrorKind::Unknown);
        assert_eq!(ErrorKind::from_status(404, false), ErrorKind::Unknown);
        assert_eq!(ErrorKind::from_status(500, false), ErrorKind::ServerFault);
        assert_eq!(ErrorKind::from_status(503, false), ErrorKind::ServerFault);
    }

    #[test]
    fn test_display_is_human_message() {
        let err = NormalizedError::new(ErrorKind::Forbidden, "Access denied").with_status(403);
        assert_eq!(err.to_string(), "Access denied");
        assert_eq!(err.status_code, Some(403));
    }

    #[test]
    fn test_serialized_shape() {
        let err = NormalizedError::new(ErrorKind::ServerFault, "boom");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "SERVER_FAULT");
        assert_eq!(json["humanMessage"], "boom");
        assert!(json["validationDetails"].as_array().unwrap().is_empty());
    }
}
