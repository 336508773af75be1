//! Telemetry collector and request scopes
//!
//! [`TelemetryCollector`] owns the bounded global history;
//! [`RequestScope`] is the request-scoped session handle. A scope is
//! created by [`begin`](TelemetryCollector::begin), threaded explicitly
//! through the request's execution path, and consumed by
//! [`finish`](RequestScope::finish). Because every scope is owned by
//! exactly one logical request, recording needs no locking at all; the
//! only synchronized structure is the history, touched once per request.
//!
//! A scope dropped without `finish` (aborted request) publishes nothing
//! and leaks nothing.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::debug;

use super::classify::{referenced_tables, statement_kind};
use super::cost::{CostModel, SyntheticCost};
use super::history::{GlobalHistory, DEFAULT_HISTORY_CAPACITY};
use super::id::next_request_id;
use super::session::{CurrentRequest, QueryEvent, RequestSession, RequestSummary};
use crate::error::{Error, Result};

/// Telemetry collector configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Number of completed request summaries retained in history
    pub history_capacity: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl TelemetryConfig {
    fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(Error::Config("history_capacity must be non-zero".into()));
        }
        Ok(())
    }
}

/// Per-request query telemetry collector.
///
/// Instantiated once at process start and shared by handle; constructing
/// a fresh instance per test gives full isolation.
pub struct TelemetryCollector {
    history: GlobalHistory,
    cost_model: Arc<dyn CostModel>,
}

impl TelemetryCollector {
    /// Create a collector with default capacity and the synthetic cost model
    pub fn new() -> Self {
        Self {
            history: GlobalHistory::new(DEFAULT_HISTORY_CAPACITY),
            cost_model: Arc::new(SyntheticCost),
        }
    }

    /// Create a collector with custom configuration
    pub fn with_config(config: TelemetryConfig) -> Result<Self> {
        Self::with_cost_model(config, Arc::new(SyntheticCost))
    }

    /// Create a collector with a custom cost model (for deterministic tests
    /// or hosts with their own cost estimation)
    pub fn with_cost_model(config: TelemetryConfig, cost_model: Arc<dyn CostModel>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            history: GlobalHistory::new(config.history_capacity),
            cost_model,
        })
    }

    /// Open a telemetry session for one inbound request.
    ///
    /// The returned scope must be threaded through the request's execution
    /// path; overlapping `begin` calls yield independent scopes.
    pub fn begin(&self, path: &str, method: &str) -> RequestScope<'_> {
        let session = RequestSession::new(next_request_id(), path, method);
        debug!(
            request_id = session.request_id.as_str(),
            "begin telemetry session: {} {}", method, path
        );
        RequestScope {
            collector: self,
            session,
        }
    }

    /// Cached summary for a completed request, if still retained
    pub fn lookup(&self, request_id: &str) -> Option<RequestSummary> {
        self.history.lookup(request_id)
    }

    /// Snapshot of the retained history, oldest first
    pub fn all(&self) -> Vec<RequestSummary> {
        self.history.all()
    }

    /// Number of retained summaries
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Drop all retained summaries (administrative)
    pub fn clear(&self) {
        self.history.clear();
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Telemetry session handle for one in-flight request.
///
/// Owned by the single logical request it was created for; dropping it
/// without calling [`finish`](RequestScope::finish) abandons the session
/// without touching the global history.
pub struct RequestScope<'a> {
    collector: &'a TelemetryCollector,
    session: RequestSession,
}

impl RequestScope<'_> {
    /// Record one operation with a cost synthesized by the collector's
    /// cost model (compatibility path for hosts that do not time
    /// statements themselves)
    pub fn record(&mut self, description: &str) {
        let cost_ms = self.collector.cost_model.synthesize(description);
        self.push_event(description, cost_ms);
    }

    /// Record one operation with a measured duration
    pub fn record_timed(&mut self, description: &str, elapsed: Duration) {
        self.push_event(description, elapsed.as_millis() as u64);
    }

    fn push_event(&mut self, description: &str, cost_ms: u64) {
        let kind = statement_kind(description);
        let tables = referenced_tables(description);
        let finished_at = Utc::now();

        debug!(
            request_id = self.session.request_id.as_str(),
            "recorded {} ({} ms)", kind, cost_ms
        );

        self.session.events.push(QueryEvent {
            kind,
            cost_ms,
            tables,
            started_at: finished_at - chrono::Duration::milliseconds(cost_ms as i64),
            finished_at,
        });
    }

    /// Id of the request this scope belongs to
    pub fn request_id(&self) -> &str {
        &self.session.request_id
    }

    /// Read-only peek at the in-progress session
    pub fn current(&self) -> CurrentRequest {
        CurrentRequest {
            request_id: self.session.request_id.clone(),
            path: self.session.path.clone(),
            method: self.session.method.clone(),
            started_at: self.session.started_at,
            events_recorded: self.session.events.len() as u64,
        }
    }

    /// Finalize the session: aggregate, publish to the global history and
    /// return the caller's independent copy of the summary.
    ///
    /// Consumes the scope, so a session is aggregated at most once.
    pub fn finish(self) -> RequestSummary {
        let summary = self.session.summarize(Utc::now());

        debug!(
            request_id = summary.request_id.as_str(),
            "finished telemetry session: {} queries, {} ms total",
            summary.total_queries,
            summary.total_cost_ms
        );

        self.collector.history.insert(summary.clone());
        summary
    }
}
