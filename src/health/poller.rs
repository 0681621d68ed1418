//! Status poller.
//!
//! # States
//! ```text
//! Idle ──start()──▶ Polling ──stop()──▶ Idle
//!                     │  ▲
//!                     └──┘ every `interval`: probe all services in parallel,
//!                          await all, replace the record mapping
//! ```
//!
//! Cancellation is cooperative. `stop()` does not abort requests in
//! flight; it bumps the session generation under the records lock, so a
//! cycle that completes afterwards finds a stale generation and is dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, RwLockWriteGuard};
use std::time::{Duration, Instant};

use chrono::Utc;
use futures_util::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::config::{ServiceConfig, StatusConfig};
use crate::health::record::{aggregate, interpret, HealthStatus, ServiceHealthRecord};
use crate::http::ApiClient;
use crate::lifecycle::{Shutdown, ShutdownSignal};
use crate::observability::metrics;

/// Shortest period between the start of two cycles.
pub const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Records keyed by service id.
pub type HealthRecords = HashMap<String, ServiceHealthRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Polling,
}

struct Shared {
    records: RwLock<HealthRecords>,
    /// Bumped on every start and stop. Only read or written under `records`.
    session: AtomicU64,
    /// Completed (committed) cycle count.
    cycles: watch::Sender<u64>,
}

impl Shared {
    fn write_records(&self) -> RwLockWriteGuard<'_, HealthRecords> {
        self.records.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the mapping if `session` is still current.
    fn commit(&self, session: u64, batch: HealthRecords) -> bool {
        let mut records = self.write_records();
        if self.session.load(Ordering::SeqCst) != session {
            tracing::debug!("Discarding health cycle that finished after stop");
            return false;
        }

        let overall = aggregate(batch.values());
        for record in batch.values() {
            metrics::record_service_health(&record.service_id, record.status);
        }
        let unhealthy = batch
            .values()
            .filter(|r| r.status == HealthStatus::Unhealthy)
            .count();
        *records = batch;
        drop(records);

        tracing::info!(overall = ?overall, unhealthy, "Health cycle complete");
        self.cycles.send_modify(|count| *count += 1);
        true
    }
}

struct Running {
    shutdown: Shutdown,
    _task: JoinHandle<()>,
}

/// Periodic health checker for the configured services.
pub struct StatusPoller {
    client: ApiClient,
    services: Arc<[ServiceConfig]>,
    interval: Duration,
    shared: Arc<Shared>,
    running: Mutex<Option<Running>>,
}

impl StatusPoller {
    /// `interval` is clamped to at least [`MIN_INTERVAL`].
    pub fn new(client: ApiClient, services: Vec<ServiceConfig>, interval: Duration) -> Self {
        if interval < MIN_INTERVAL {
            tracing::warn!(
                requested_ms = interval.as_millis() as u64,
                "Poll interval too short; using the minimum"
            );
        }
        let (cycles, _) = watch::channel(0);
        Self {
            client,
            services: services.into(),
            interval: interval.max(MIN_INTERVAL),
            shared: Arc::new(Shared {
                records: RwLock::new(HashMap::new()),
                session: AtomicU64::new(0),
                cycles,
            }),
            running: Mutex::new(None),
        }
    }

    pub fn from_config(client: ApiClient, config: &StatusConfig) -> Self {
        Self::new(
            client,
            config.services.clone(),
            Duration::from_secs(config.interval_secs),
        )
    }

    /// Idle → Polling. The first cycle starts immediately.
    ///
    /// Starts a fresh session with an empty mapping. Returns false if
    /// already polling. Must be called inside a Tokio runtime.
    pub fn start(&self) -> bool {
        let mut running = self.running.lock().unwrap_or_else(|e| e.into_inner());
        if running.is_some() {
            return false;
        }

        let session = {
            let mut records = self.shared.write_records();
            records.clear();
            self.shared.session.fetch_add(1, Ordering::SeqCst) + 1
        };

        let shutdown = Shutdown::new();
        let task = tokio::spawn(poll_loop(
            self.client.clone(),
            self.services.clone(),
            self.interval,
            self.shared.clone(),
            session,
            shutdown.subscribe(),
        ));

        tracing::info!(
            services = self.services.len(),
            interval_secs = self.interval.as_secs(),
            "Status poller started"
        );
        *running = Some(Running {
            shutdown,
            _task: task,
        });
        true
    }

    /// Polling → Idle. No cycle completing after this call changes the mapping.
    ///
    /// Returns false if already idle.
    pub fn stop(&self) -> bool {
        let mut running = self.running.lock().unwrap_or_else(|e| e.into_inner());
        let Some(run) = running.take() else {
            return false;
        };

        {
            let _records = self.shared.write_records();
            self.shared.session.fetch_add(1, Ordering::SeqCst);
        }
        run.shutdown.trigger();

        tracing::info!("Status poller stopped");
        true
    }

    pub fn state(&self) -> PollerState {
        match *self.running.lock().unwrap_or_else(|e| e.into_inner()) {
            Some(_) => PollerState::Polling,
            None => PollerState::Idle,
        }
    }

    /// Copy of the current mapping.
    pub fn records(&self) -> HealthRecords {
        self.shared
            .records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Current records in service registration order.
    pub fn snapshot(&self) -> Vec<ServiceHealthRecord> {
        let records = self.records();
        self.services
            .iter()
            .filter_map(|s| records.get(&s.id).cloned())
            .collect()
    }

    pub fn aggregate(&self) -> HealthStatus {
        aggregate(self.records().values())
    }

    /// Completed-cycle counter; changes after every committed cycle.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.cycles.subscribe()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn services(&self) -> &[ServiceConfig] {
        &self.services
    }

    /// Probe every service once without touching the stored mapping.
    pub async fn run_cycle(&self) -> HealthRecords {
        check_services(&self.client, &self.services).await
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop(
    client: ApiClient,
    services: Arc<[ServiceConfig]>,
    interval: Duration,
    shared: Arc<Shared>,
    session: u64,
    mut shutdown: ShutdownSignal,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if shared.session.load(Ordering::SeqCst) != session {
                    break;
                }
                let batch = check_services(&client, &services).await;
                if !shared.commit(session, batch) {
                    break;
                }
            }
            _ = shutdown.wait() => {
                break;
            }
        }
    }

    tracing::debug!(session, "Status poll loop exited");
}

async fn check_services(client: &ApiClient, services: &[ServiceConfig]) -> HealthRecords {
    join_all(services.iter().map(|service| check_service(client, service)))
        .await
        .into_iter()
        .map(|record| (record.service_id.clone(), record))
        .collect()
}

async fn check_service(client: &ApiClient, service: &ServiceConfig) -> ServiceHealthRecord {
    let started = Instant::now();
    let result = client.get(&service.path).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let (status, response_time_ms, error_detail) = match result {
        Ok(payload) => {
            let (status, detail) = interpret(&payload.body);
            (status, Some(elapsed_ms), detail)
        }
        Err(err) => {
            tracing::warn!(
                service = %service.id,
                kind = err.kind.as_str(),
                error = %err,
                "Health check failed"
            );
            (HealthStatus::Unhealthy, None, Some(err.human_message))
        }
    };

    ServiceHealthRecord {
        service_id: service.id.clone(),
        display_name: service.name.clone(),
        status,
        last_checked_at: Utc::now(),
        response_time_ms,
        error_detail,
    }
}
