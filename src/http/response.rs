//! Successful responses.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{ErrorKind, NormalizedError};
use crate::http::transport::RawResponse;

/// Body of a successful (2xx) response.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    pub status: u16,
    /// Decoded JSON; `Null` for an empty body, a string for non-JSON text.
    pub body: Value,
}

impl Payload {
    pub fn from_raw(raw: RawResponse) -> Self {
        let body = if raw.body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&raw.body).unwrap_or(Value::String(raw.body))
        };
        Self {
            status: raw.status,
            body,
        }
    }

    /// Decode the body into a typed value.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, NormalizedError> {
        T::deserialize(&self.body).map_err(|e| {
            NormalizedError::new(
                ErrorKind::Unknown,
                format!("Unexpected response format: {}", e),
            )
            .with_status(self.status)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_body_decoding() {
        assert_eq!(Payload::from_raw(raw(204, "")).body, Value::Null);
        assert_eq!(Payload::from_raw(raw(200, "pong")).body, Value::String("pong".into()));
        assert_eq!(Payload::from_raw(raw(200, r#"{"a":1}"#)).body["a"], 1);
    }

    #[test]
    fn test_typed_decode_failure_is_normalized() {
        #[derive(Debug, Deserialize)]
        struct Expected {
            #[allow(dead_code)]
            id: u64,
        }

        let payload = Payload::from_raw(raw(200, r#"{"name": "x"}"#));
        let err = payload.json::<Expected>().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unknown);
        assert_eq!(err.status_code, Some(200));
        assert!(err.human_message.starts_with("Unexpected response format"));
    }
}
