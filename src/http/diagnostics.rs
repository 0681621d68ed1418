//! Connectivity self-check.
//!
//! Sends an empty registration request. The backend rejects it with a
//! validation error, which proves the base URL, routing and CORS setup
//! without creating anything. Any HTTP answer counts as reachable; only a
//! transport or cross-origin failure does not.

use std::time::Instant;

use serde::Serialize;
use serde_json::json;

use crate::endpoints::Endpoint;
use crate::errors::{ErrorKind, NormalizedError};
use crate::http::{ApiClient, RequestDescriptor};

/// What the client resolved and what the backend answered.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectivityReport {
    pub base_url: String,
    pub environment: String,
    pub client_name: String,
    pub client_version: String,
    pub timeout_ms: u64,
    pub authenticated: bool,
    pub probe_path: String,
    pub reachable: bool,
    pub status_code: Option<u16>,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<NormalizedError>,
}

impl ApiClient {
    pub async fn check_connectivity(&self) -> ConnectivityReport {
        let probe_path = Endpoint::Register.path();
        let (client_name, client_version) = self.client_identity();

        let started = Instant::now();
        let outcome = self
            .send(RequestDescriptor::post(probe_path.clone()).with_body(json!({})))
            .await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let (reachable, status_code, error) = match outcome {
            Ok(payload) => (true, Some(payload.status), None),
            Err(err) => {
                let reachable = err.status_code.is_some()
                    && !matches!(err.kind, ErrorKind::Network | ErrorKind::CrossOrigin);
                (reachable, err.status_code, Some(err))
            }
        };

        if reachable {
            tracing::info!(base_url = %self.base_url(), status = ?status_code, elapsed_ms, "Backend reachable");
        } else {
            tracing::warn!(base_url = %self.base_url(), elapsed_ms, "Backend unreachable");
        }

        ConnectivityReport {
            base_url: self.base_url().to_string(),
            environment: self.environment().to_string(),
            client_name: client_name.to_string(),
            client_version: client_version.to_string(),
            timeout_ms: self.default_timeout().as_millis() as u64,
            authenticated: self.tokens().get().is_some(),
            probe_path,
            reachable,
            status_code,
            elapsed_ms,
            error,
        }
    }
}
