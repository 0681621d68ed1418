//! Service health records and aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    Unknown,
}

/// Last-known state of one service. Replaced wholesale every cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHealthRecord {
    pub service_id: String,
    pub display_name: String,
    pub status: HealthStatus,
    pub last_checked_at: DateTime<Utc>,
    pub response_time_ms: Option<u64>,
    pub error_detail: Option<String>,
}

/// Overall status: any Unhealthy wins, then any Unknown, else Healthy.
pub fn aggregate<'a, I>(records: I) -> HealthStatus
where
    I: IntoIterator<Item = &'a ServiceHealthRecord>,
{
    let mut overall = HealthStatus::Healthy;
    for record in records {
        match record.status {
            HealthStatus::Unhealthy => return HealthStatus::Unhealthy,
            HealthStatus::Unknown => overall = HealthStatus::Unknown,
            HealthStatus::Healthy => {}
        }
    }
    overall
}

/// Read a Spring actuator health body from a 2xx response.
///
/// A body without a `status` field counts as healthy: the call succeeded.
pub fn interpret(body: &Value) -> (HealthStatus, Option<String>) {
    match body.get("status").and_then(Value::as_str) {
        None => (HealthStatus::Healthy, None),
        Some("UP") => (HealthStatus::Healthy, None),
        Some(s @ ("DOWN" | "OUT_OF_SERVICE")) => {
            (HealthStatus::Unhealthy, Some(format!("Service reported {}", s)))
        }
        Some(other) => (
            HealthStatus::Unknown,
            Some(format!("Service reported {}", other)),
        ),
    }
}
