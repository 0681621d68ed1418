//! HTTP client subsystem.
//!
//! # Data Flow
//! ```text
//! caller builds RequestDescriptor (request.rs)
//!     → client.rs (credential + diagnostic headers, request ID)
//!     → transport.rs (one network attempt, reqwest)
//!     → 2xx: response.rs (Payload)
//!     → otherwise: errors::normalize → NormalizedError
//!         → 401: credential cleared, SessionEvent broadcast
//! ```

pub mod client;
pub mod diagnostics;
pub mod request;
pub mod response;
pub mod transport;

pub use client::{ApiClient, SessionEvent};
pub use diagnostics::ConnectivityReport;
pub use request::{Method, RequestDescriptor};
pub use response::Payload;
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportError, TransportErrorKind};
