//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dashboard_requests_total` (counter): dispatches by method, outcome
//! - `dashboard_request_duration_seconds` (histogram): latency by method
//! - `dashboard_errors_total` (counter): normalized failures by kind
//! - `dashboard_service_health` (gauge): 1=healthy, 0=unhealthy, -1=unknown
//!
//! Recording is a no-op until a recorder is installed with `init_metrics`.

use std::net::SocketAddr;
use std::time::Duration;

use ::metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::errors::ErrorKind;
use crate::health::record::HealthStatus;
use crate::http::request::Method;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: Method, outcome: Result<u16, ErrorKind>, elapsed: Duration) {
    let outcome = match outcome {
        Ok(_) => "success",
        Err(kind) => kind.as_str(),
    };
    counter!("dashboard_requests_total", "method" => method.as_str(), "outcome" => outcome)
        .increment(1);
    histogram!("dashboard_request_duration_seconds", "method" => method.as_str())
        .record(elapsed.as_secs_f64());

    if outcome != "success" {
        counter!("dashboard_errors_total", "kind" => outcome).increment(1);
    }
}

pub fn record_service_health(service: &str, status: HealthStatus) {
    let value = match status {
        HealthStatus::Healthy => 1.0,
        HealthStatus::Unhealthy => 0.0,
        HealthStatus::Unknown => -1.0,
    };
    gauge!("dashboard_service_health", "service" => service.to_string()).set(value);
}
