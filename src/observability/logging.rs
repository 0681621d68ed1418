//! Structured logging.
//!
//! `RUST_LOG` wins over the configured level so a single run can be turned
//! up without editing the config file.

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Stdout,
    /// Keeps stdout clean for command output.
    Stderr,
}

/// Install the global subscriber. Call once, from a binary.
pub fn init(config: &ObservabilityConfig, output: Output) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&config.log_level)));

    let json = config
        .json_logs
        .then(|| tracing_subscriber::fmt::layer().json().with_writer(writer(output)));
    let plain = (!config.json_logs)
        .then(|| tracing_subscriber::fmt::layer().with_writer(writer(output)));

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(plain)
        .init();
}

fn writer(output: Output) -> BoxMakeWriter {
    match output {
        Output::Stdout => BoxMakeWriter::new(std::io::stdout),
        Output::Stderr => BoxMakeWriter::new(std::io::stderr),
    }
}

fn default_directive(level: &str) -> String {
    format!("dashboard_client={level},dashboard={level},dashboard_cli={level},warn")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_parses() {
        let directive = default_directive("debug");
        assert!(directive.starts_with("dashboard_client=debug"));
        assert!(EnvFilter::try_new(directive).is_ok());
    }
}
