//! Error normalization.
//!
//! # Precedence
//! ```text
//! 1. cross-origin signal on a transport failure
//! 2. structured backend error body
//! 3. HTTP status fallback (with any bare `message` the body carried)
//! 4. default message
//! ```
//!
//! `normalize` is pure: the same input always yields an equal output.

use crate::errors::body::ErrorBody;
use crate::errors::types::{ErrorKind, NormalizedError};
use crate::http::transport::{TransportError, TransportErrorKind};

pub const FALLBACK_MESSAGE: &str = "Something went wrong!";

pub const CROSS_ORIGIN_MESSAGE: &str =
    "CORS Error: Request blocked by browser. Check proxy configuration.";

pub const CROSS_ORIGIN_SUGGESTION: &str =
    "This usually means the backend is not running or CORS is not configured properly.";

pub const CROSS_ORIGIN_REMEDIATION: [&str; 4] = [
    "Make sure the backend is running and reachable at the configured base URL",
    "Check that the development proxy configuration forwards API paths",
    "Verify the backend CORS configuration allows this origin",
    "Try refreshing the page or restarting the development server",
];

/// Substrings that mark a transport message as a cross-origin rejection.
const CROSS_ORIGIN_MARKERS: [&str; 2] = ["CORS", "blocked"];

/// A failed dispatch before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawFailure {
    /// No response arrived.
    Transport(TransportError),
    /// A non-success response arrived.
    Response { status: u16, body: String },
}

/// True if a transport failure looks like a cross-origin rejection.
///
/// A typed `CrossOrigin` reason wins; otherwise the message text is matched.
pub fn is_cross_origin(error: &TransportError) -> bool {
    error.kind == TransportErrorKind::CrossOrigin
        || CROSS_ORIGIN_MARKERS
            .iter()
            .any(|marker| error.message.contains(marker))
}

/// Convert a raw failure into the normalized error shape.
pub fn normalize(failure: &RawFailure) -> NormalizedError {
    match failure {
        RawFailure::Transport(error) if is_cross_origin(error) => cross_origin(),
        RawFailure::Transport(error) => {
            let message = if error.message.trim().is_empty() {
                FALLBACK_MESSAGE.to_string()
            } else {
                error.message.clone()
            };
            NormalizedError::new(ErrorKind::Network, message)
        }
        RawFailure::Response { status, body } => from_response(*status, body),
    }
}

fn cross_origin() -> NormalizedError {
    let mut err = NormalizedError::new(ErrorKind::CrossOrigin, CROSS_ORIGIN_MESSAGE);
    err.suggestion = Some(CROSS_ORIGIN_SUGGESTION.to_string());
    err.remediation = CROSS_ORIGIN_REMEDIATION.iter().map(|s| s.to_string()).collect();
    err
}

fn from_response(status: u16, body: &str) -> NormalizedError {
    match ErrorBody::parse(body) {
        ErrorBody::Structured(body) => {
            let status = body.status.unwrap_or(status);
            let kind = ErrorKind::from_status(status, !body.validation_errors.is_empty());
            NormalizedError {
                human_message: body.message,
                kind,
                status_code: Some(status),
                error_code: body.error_code,
                validation_details: body.validation_errors,
                suggestion: body.suggestion,
                remediation: Vec::new(),
            }
        }
        ErrorBody::MessageOnly(message) => {
            NormalizedError::new(ErrorKind::from_status(status, false), message).with_status(status)
        }
        ErrorBody::Unrecognized => {
            NormalizedError::new(ErrorKind::from_status(status, false), status_message(status))
                .with_status(status)
        }
    }
}

fn status_message(status: u16) -> String {
    match status {
        401 => "Authentication required. Please sign in again.".to_string(),
        403 => "You don't have permission to perform this action.".to_string(),
        404 => "The requested resource was not found.".to_string(),
        s if s >= 500 => format!("Server error ({}). Please try again later.", s),
        _ => FALLBACK_MESSAGE.to_string(),
    }
}
