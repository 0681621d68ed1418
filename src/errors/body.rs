//! Backend error body parsing.
//!
//! Bodies are decoded against the backend's error schema first; anything
//! that does not fit falls through to a weaker variant instead of being
//! inspected field by field.

use serde::Deserialize;

use crate::errors::types::ValidationDetail;

/// The backend's structured error response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendErrorBody {
    pub error: String,
    pub message: String,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub validation_errors: Vec<ValidationDetail>,
    #[serde(default)]
    pub suggestion: Option<String>,
}

/// Any JSON object that at least carries a message.
#[derive(Debug, Deserialize)]
struct MessageOnlyBody {
    message: String,
}

/// Result of decoding an error body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorBody {
    /// Matches the backend error schema (`error` and `message` both present).
    Structured(BackendErrorBody),
    /// Not the schema, but has a `message` string.
    MessageOnly(String),
    /// Empty, not JSON, or no usable fields.
    Unrecognized,
}

impl ErrorBody {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return ErrorBody::Unrecognized;
        }

        match serde_json::from_str::<BackendErrorBody>(raw) {
            Ok(body) if !body.error.is_empty() && !body.message.is_empty() => {
                return ErrorBody::Structured(body);
            }
            _ => {}
        }

        match serde_json::from_str::<MessageOnlyBody>(raw) {
            Ok(body) if !body.message.is_empty() => ErrorBody::MessageOnly(body.message),
            _ => ErrorBody::Unrecognized,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ValidationDetail>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<ValidationDetail>>::deserialize(deserializer)?.unwrap_or_default())
}
