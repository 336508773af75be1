//! Admission controller
//!
//! Per-client sliding-window rate limiting with two independent ceilings:
//! a burst ceiling over the last minute and a sustained ceiling over the
//! last hour. Both windows are evaluated against the same "now", deny
//! takes priority, and denied requests are never recorded so a throttled
//! client does not dig itself deeper.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::window::{ClientWindow, HOUR_WINDOW_SECS, MINUTE_WINDOW_SECS};
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};

/// Default burst ceiling (requests per minute)
pub const DEFAULT_PER_MINUTE_LIMIT: u64 = 60;

/// Default sustained ceiling (requests per hour)
pub const DEFAULT_PER_HOUR_LIMIT: u64 = 1000;

/// Default background sweep period
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Admission controller configuration
#[derive(Debug, Clone)]
pub struct AdmissionConfig {
    /// Maximum requests per client within any 60-second window
    pub per_minute_limit: u64,
    /// Maximum requests per client within any 3600-second window
    pub per_hour_limit: u64,
    /// Period of the background sweep that drops idle clients
    pub sweep_interval: Duration,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            per_minute_limit: DEFAULT_PER_MINUTE_LIMIT,
            per_hour_limit: DEFAULT_PER_HOUR_LIMIT,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl AdmissionConfig {
    fn validate(&self) -> Result<()> {
        if self.per_minute_limit == 0 {
            return Err(Error::Config("per_minute_limit must be non-zero".into()));
        }
        if self.per_hour_limit < self.per_minute_limit {
            return Err(Error::Config(format!(
                "per_hour_limit ({}) must be >= per_minute_limit ({})",
                self.per_hour_limit, self.per_minute_limit
            )));
        }
        if self.sweep_interval.is_zero() {
            return Err(Error::Config("sweep_interval must be non-zero".into()));
        }
        Ok(())
    }
}

/// Quota snapshot for one client, suitable for rate-limit response headers.
///
/// `remaining_* + used_*` always equals the configured ceiling; remaining
/// values saturate at zero.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuotaInfo {
    /// Requests left in the current minute window
    pub remaining_per_minute: u64,
    /// Requests left in the current hour window
    pub remaining_per_hour: u64,
    /// Requests counted in the current minute window
    pub used_per_minute: u64,
    /// Requests counted in the current hour window
    pub used_per_hour: u64,
}

impl QuotaInfo {
    fn full(config: &AdmissionConfig) -> Self {
        Self {
            remaining_per_minute: config.per_minute_limit,
            remaining_per_hour: config.per_hour_limit,
            used_per_minute: 0,
            used_per_hour: 0,
        }
    }
}

/// In-memory, multi-window admission controller.
///
/// One [`ClientWindow`] per client identifier, held in a concurrent map so
/// independent clients never contend; each window is mutated under its map
/// entry's lock only. Memory stays bounded by the lazy prune on every
/// decision plus the periodic [`run`](AdmissionController::run) sweep that
/// drops clients idle for longer than the hour window.
pub struct AdmissionController {
    clients: DashMap<String, ClientWindow>,
    config: AdmissionConfig,
    clock: Arc<dyn Clock>,
    epoch: Instant,
    shutdown: AtomicBool,
}

impl AdmissionController {
    /// Create a controller with default ceilings (60/minute, 1000/hour)
    pub fn new() -> Self {
        Self::build(AdmissionConfig::default(), Arc::new(SystemClock))
    }

    /// Create a controller with custom configuration
    pub fn with_config(config: AdmissionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, Arc::new(SystemClock)))
    }

    /// Create a controller with a custom clock (for testing)
    pub fn with_clock(config: AdmissionConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, clock))
    }

    fn build(config: AdmissionConfig, clock: Arc<dyn Clock>) -> Self {
        let epoch = clock.now();
        Self {
            clients: DashMap::new(),
            config,
            clock,
            epoch,
            shutdown: AtomicBool::new(false),
        }
    }

    /// Get the active configuration
    pub fn config(&self) -> &AdmissionConfig {
        &self.config
    }

    /// Seconds since the controller's epoch, the unit of window buckets
    fn now_secs(&self) -> u64 {
        self.clock.now().duration_since(self.epoch).as_secs()
    }

    /// Decide whether to admit one request from `client_id`.
    ///
    /// Checks both windows against the same "now" before recording. A
    /// request denied by either window is not recorded, so denial does not
    /// extend the client's throttled period.
    pub fn allow(&self, client_id: &str) -> bool {
        let now = self.now_secs();
        let mut window = self.clients.entry(client_id.to_string()).or_default();

        window.prune(now);

        let used_minute = window.count_within(now, MINUTE_WINDOW_SECS);
        if used_minute >= self.config.per_minute_limit {
            warn!(
                client = client_id,
                "rate limit exceeded: {} requests in last minute", used_minute
            );
            return false;
        }

        let used_hour = window.count_within(now, HOUR_WINDOW_SECS);
        if used_hour >= self.config.per_hour_limit {
            warn!(
                client = client_id,
                "rate limit exceeded: {} requests in last hour", used_hour
            );
            return false;
        }

        window.record(now);
        true
    }

    /// Snapshot the remaining and used quota for `client_id`.
    ///
    /// Applies the same pruning as [`allow`](AdmissionController::allow),
    /// so the snapshot never disagrees with the next admission decision.
    /// Unknown clients report full quota.
    pub fn info(&self, client_id: &str) -> QuotaInfo {
        let now = self.now_secs();
        let mut window = match self.clients.get_mut(client_id) {
            Some(window) => window,
            None => return QuotaInfo::full(&self.config),
        };

        window.prune(now);
        let used_per_minute = window.count_within(now, MINUTE_WINDOW_SECS);
        let used_per_hour = window.count_within(now, HOUR_WINDOW_SECS);

        QuotaInfo {
            remaining_per_minute: self.config.per_minute_limit.saturating_sub(used_per_minute),
            remaining_per_hour: self.config.per_hour_limit.saturating_sub(used_per_hour),
            used_per_minute,
            used_per_hour,
        }
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }

    /// Prune every window and drop clients with no arrivals left.
    ///
    /// Called periodically by [`run`](AdmissionController::run); exposed so
    /// hosts without a background task can sweep on their own schedule.
    pub fn sweep(&self) {
        let now = self.now_secs();
        self.clients.retain(|_, window| {
            window.prune(now);
            !window.is_empty()
        });

        debug!(
            clients = self.clients.len(),
            "swept expired rate limit records"
        );
    }

    /// Run the background sweep loop.
    ///
    /// Prunes all client windows every `sweep_interval` until
    /// [`shutdown`](AdmissionController::shutdown) is signalled.
    #[instrument(skip(self))]
    pub async fn run(self: Arc<Self>) {
        info!(
            interval_secs = self.config.sweep_interval.as_secs(),
            "starting admission sweep loop"
        );

        let mut tick = tokio::time::interval(self.config.sweep_interval);
        // The first tick fires immediately; skip it so the first real sweep
        // happens one full interval after startup.
        tick.tick().await;

        loop {
            tick.tick().await;
            if self.shutdown.load(Ordering::Relaxed) {
                info!("admission sweep loop shutting down");
                break;
            }
            self.sweep();
        }
    }

    /// Signal shutdown to the sweep loop
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

impl Default for AdmissionController {
    fn default() -> Self {
        Self::new()
    }
}
