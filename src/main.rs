//! Dashboard status monitor.
//!
//! ```text
//!   config ──▶ ApiClient ──▶ StatusPoller ──(every interval)──▶ backend /actuator/health
//!                  │               │
//!                  │               └──▶ cycle log + dashboard_service_health gauge
//!                  └──▶ SessionEvent (401) ──▶ warning to sign in again
//! ```
//!
//! Runs until Ctrl-C / SIGTERM, then stops the poller.

use std::path::PathBuf;

use clap::Parser;
use dashboard_client::auth::token_store;
use dashboard_client::config::{load_config, load_default};
use dashboard_client::lifecycle::wait_for_signal;
use dashboard_client::observability::{logging, metrics};
use dashboard_client::{ApiClient, SessionEvent, StatusPoller};

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "Polls backend health and reports system status", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults plus DASHBOARD_* overrides when absent.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => load_default()?,
    };

    logging::init(&config.observability, logging::Output::Stdout);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.api.environment,
        base_url = %config.api.base_url,
        timeout_ms = config.api.timeout_ms,
        services = config.status.services.len(),
        "dashboard starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let tokens = token_store::from_config(&config.session);
    let client = ApiClient::from_config(&config, tokens)?;
    let mut session_events = client.session_events();

    let poller = StatusPoller::from_config(client, &config.status);
    let mut cycles = poller.subscribe();
    poller.start();

    let signal = wait_for_signal();
    tokio::pin!(signal);

    loop {
        tokio::select! {
            _ = &mut signal => break,
            changed = cycles.changed() => {
                if changed.is_err() {
                    break;
                }
                for record in poller.snapshot() {
                    tracing::info!(
                        service = %record.service_id,
                        name = %record.display_name,
                        status = ?record.status,
                        response_time_ms = ?record.response_time_ms,
                        error = ?record.error_detail,
                        "Service status"
                    );
                }
                tracing::info!(overall = ?poller.aggregate(), "System status");
            }
            Ok(event) = session_events.recv() => {
                match event {
                    SessionEvent::SignInRequired { sign_in_path } => tracing::warn!(
                        sign_in_path = %sign_in_path,
                        "Backend rejected the stored credential; sign in again"
                    ),
                }
            }
        }
    }

    poller.stop();
    tracing::info!("Shutdown complete");
    Ok(())
}
