//! API client core.
//!
//! # Responsibilities
//! - Decorate every descriptor (credential, diagnostic headers, request ID)
//! - Perform exactly one transport attempt per call
//! - Convert every failure into a `NormalizedError`
//! - Clear the credential and notify subscribers on 401
//! - Report dispatches and outcomes to the log and metrics
//!
//! # Design Decisions
//! - Explicitly constructed; credential store and transport are injected
//! - Navigation after a 401 is the caller's decision, announced via
//!   `SessionEvent::SignInRequired`
//! - No retry, backoff, caching or deduplication

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast;
use url::Url;

use crate::auth::token_store::TokenStore;
use crate::config::{ApiConfig, DashboardConfig};
use crate::errors::{normalize, ErrorKind, NormalizedError, RawFailure};
use crate::http::request::{
    RequestDescriptor, HEADER_AUTHORIZATION, HEADER_CLIENT_NAME, HEADER_CLIENT_VERSION,
    HEADER_REQUESTED_WITH, HEADER_REQUEST_ID, REQUESTED_WITH_SCRIPT,
};
use crate::http::response::Payload;
use crate::http::transport::{ReqwestTransport, Transport};
use crate::observability::metrics;

/// Notifications for the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The backend rejected the credential; it has been cleared.
    SignInRequired { sign_in_path: String },
}

struct ClientInner {
    base_url: String,
    default_timeout: Duration,
    client_name: String,
    client_version: String,
    environment: String,
    sign_in_path: String,
    diagnostics: bool,
    tokens: Arc<dyn TokenStore>,
    transport: Arc<dyn Transport>,
    events: broadcast::Sender<SessionEvent>,
}

/// Cheaply cloneable handle to the backend API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl ApiClient {
    /// Build a client over an explicit transport.
    pub fn new(
        config: &ApiConfig,
        diagnostics: bool,
        tokens: Arc<dyn TokenStore>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, url::ParseError> {
        Url::parse(&config.base_url)?;
        let (events, _) = broadcast::channel(16);

        Ok(Self {
            inner: Arc::new(ClientInner {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                default_timeout: Duration::from_millis(config.timeout_ms),
                client_name: config.client_name.clone(),
                client_version: config.client_version.clone(),
                environment: config.environment.clone(),
                sign_in_path: config.sign_in_path.clone(),
                diagnostics,
                tokens,
                transport,
                events,
            }),
        })
    }

    /// Build a reqwest-backed client from the full configuration.
    pub fn from_config(
        config: &DashboardConfig,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, url::ParseError> {
        Self::new(
            &config.api,
            config.observability.debug,
            tokens,
            Arc::new(ReqwestTransport::new()),
        )
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.inner.tokens
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn environment(&self) -> &str {
        &self.inner.environment
    }

    /// Client name and version sent in the diagnostic headers.
    pub fn client_identity(&self) -> (&str, &str) {
        (&self.inner.client_name, &self.inner.client_version)
    }

    /// Timeout applied when a descriptor does not carry its own.
    pub fn default_timeout(&self) -> Duration {
        self.inner.default_timeout
    }

    /// Subscribe to session notifications (sign-in required).
    pub fn session_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Resolve the URL and decorate the descriptor for dispatch.
    ///
    /// The `Authorization` header is present exactly when a credential is
    /// stored; any caller-supplied value is replaced or removed.
    pub fn prepare(
        &self,
        mut request: RequestDescriptor,
    ) -> Result<(Url, RequestDescriptor), NormalizedError> {
        let path = request.path.trim();
        if path.is_empty() {
            return Err(NormalizedError::new(
                ErrorKind::Unknown,
                "Request path must not be empty",
            ));
        }

        if has_dot_segment(path) {
            return Err(NormalizedError::new(
                ErrorKind::Unknown,
                format!("Request path '{}' must not contain '.' or '..' segments", path),
            ));
        }

        let joined = if path.starts_with('/') {
            format!("{}{}", self.inner.base_url, path)
        } else {
            format!("{}/{}", self.inner.base_url, path)
        };
        let mut url = Url::parse(&joined).map_err(|e| {
            NormalizedError::new(
                ErrorKind::Unknown,
                format!("Invalid request URL '{}': {}", joined, e),
            )
        })?;
        if !request.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        request.remove_header(HEADER_AUTHORIZATION);
        if let Some(credential) = self.inner.tokens.get() {
            request.headers.insert(
                HEADER_AUTHORIZATION.to_string(),
                format!("Bearer {}", credential.as_str()),
            );
        }

        let headers = &mut request.headers;
        headers.insert("Accept".into(), "application/json".into());
        headers.insert("Content-Type".into(), "application/json".into());
        headers.insert(HEADER_CLIENT_NAME.into(), self.inner.client_name.clone());
        headers.insert(HEADER_CLIENT_VERSION.into(), self.inner.client_version.clone());
        headers.insert(HEADER_REQUESTED_WITH.into(), REQUESTED_WITH_SCRIPT.into());
        if request.header(HEADER_REQUEST_ID).is_none() {
            request.headers.insert(
                HEADER_REQUEST_ID.into(),
                uuid::Uuid::new_v4().to_string(),
            );
        }

        Ok((url, request))
    }

    /// Dispatch one request. Resolves to exactly one payload or error.
    pub async fn send(&self, request: RequestDescriptor) -> Result<Payload, NormalizedError> {
        let method = request.method;
        let (url, request) = match self.prepare(request) {
            Ok(prepared) => prepared,
            Err(err) => {
                if self.inner.diagnostics {
                    tracing::warn!(error = %err, "Request rejected before dispatch");
                }
                return Err(err);
            }
        };

        let request_id = request.header(HEADER_REQUEST_ID).unwrap_or_default().to_string();
        let timeout = request.timeout.unwrap_or(self.inner.default_timeout);

        if self.inner.diagnostics {
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                url = %url,
                environment = %self.inner.environment,
                authenticated = request.header(HEADER_AUTHORIZATION).is_some(),
                "API request"
            );
        }

        let started = Instant::now();
        let (http_status, outcome) =
            match self.inner.transport.execute(url.clone(), &request, timeout).await {
                Ok(raw) if (200..300).contains(&raw.status) => {
                    (Some(raw.status), Ok(Payload::from_raw(raw)))
                }
                Ok(raw) => {
                    let status = raw.status;
                    let failure = RawFailure::Response {
                        status,
                        body: raw.body,
                    };
                    (Some(status), Err(normalize(&failure)))
                }
                Err(e) => (None, Err(normalize(&RawFailure::Transport(e)))),
            };
        let elapsed = started.elapsed();

        metrics::record_request(
            method,
            outcome.as_ref().map(|p| p.status).map_err(|e| e.kind),
            elapsed,
        );

        match &outcome {
            Ok(payload) => {
                if self.inner.diagnostics {
                    tracing::debug!(
                        request_id = %request_id,
                        status = payload.status,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "API response"
                    );
                }
            }
            Err(err) => {
                if self.inner.diagnostics {
                    tracing::warn!(
                        request_id = %request_id,
                        method = %method,
                        url = %url,
                        kind = err.kind.as_str(),
                        status = ?err.status_code,
                        elapsed_ms = elapsed.as_millis() as u64,
                        message = %err.human_message,
                        "API error"
                    );
                }
                if http_status == Some(401) || err.status_code == Some(401) {
                    self.sign_in_required();
                }
            }
        }

        outcome
    }

    fn sign_in_required(&self) {
        self.inner.tokens.clear();
        tracing::info!(
            sign_in_path = %self.inner.sign_in_path,
            "Credential rejected; cleared and sign-in required"
        );
        // No subscribers is fine.
        let _ = self.inner.events.send(SessionEvent::SignInRequired {
            sign_in_path: self.inner.sign_in_path.clone(),
        });
    }

    pub async fn get(&self, path: &str) -> Result<Payload, NormalizedError> {
        self.send(RequestDescriptor::get(path)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Payload, NormalizedError> {
        self.send(RequestDescriptor::delete(path)).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Payload, NormalizedError> {
        self.send(RequestDescriptor::post(path).with_json(body)?).await
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<Payload, NormalizedError> {
        self.send(RequestDescriptor::put(path).with_json(body)?).await
    }

    /// GET and decode the body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, NormalizedError> {
        self.get(path).await?.json()
    }
}

/// URL parsing collapses `.` and `..` (also when written as `%2e`), which
/// would silently retarget the request.
fn has_dot_segment(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    })
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("timeout_ms", &self.inner.default_timeout.as_millis())
            .field("environment", &self.inner.environment)
            .field("diagnostics", &self.inner.diagnostics)
            .finish()
    }
}
