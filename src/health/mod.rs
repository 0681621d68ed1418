//! System status subsystem.
//!
//! # Data Flow
//! ```text
//! poller.rs (timer, Polling state)
//!     → one ApiClient GET per service, all in flight together
//!     → record.rs (actuator body → HealthStatus)
//!     → whole mapping replaced, aggregate recomputed
//! ```
//!
//! # Design Decisions
//! - Replace, never merge: a service that fails is recorded Unhealthy,
//!   not left with last cycle's value
//! - Cycles never overlap; the next tick waits for the current batch
//! - Results that land after stop() are discarded

pub mod poller;
pub mod record;

pub use poller::{HealthRecords, PollerState, StatusPoller, MIN_INTERVAL};
pub use record::{aggregate, HealthStatus, ServiceHealthRecord};
