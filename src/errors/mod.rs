//! Error normalization subsystem.
//!
//! # Data Flow
//! ```text
//! transport failure ─┐
//!                    ├─→ RawFailure → normalizer.rs → NormalizedError → caller
//! error response ────┘         │
//!                              └─→ body.rs (tagged parse of the backend body)
//! ```
//!
//! # Design Decisions
//! - Every failure path ends as a NormalizedError; nothing raw escapes
//! - Cross-origin detection is a text heuristic unless the transport reports it

pub mod body;
pub mod normalizer;
pub mod types;

pub use body::{BackendErrorBody, ErrorBody};
pub use normalizer::{normalize, RawFailure};
pub use types::{ErrorKind, NormalizedError, ValidationDetail};
