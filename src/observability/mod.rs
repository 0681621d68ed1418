//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! ApiClient / StatusPoller produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (plain or JSON lines)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Per-dispatch diagnostics are gated by `observability.debug`
//! - Request ID is attached to every dispatch log line

pub mod logging;
pub mod metrics;
