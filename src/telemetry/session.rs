//! Request sessions and finalized summaries
//!
//! A [`RequestSession`] is the mutable per-request accumulator: events are
//! appended in call order and never mutated afterwards. Finalization walks
//! the event list exactly once and produces an immutable
//! [`RequestSummary`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classify::StatementKind;

/// One instrumented operation within a request
#[derive(Debug, Clone, Serialize)]
pub struct QueryEvent {
    /// Operation category derived from the statement text
    pub kind: StatementKind,
    /// Cost attributed to the operation, in milliseconds
    pub cost_ms: u64,
    /// Tables the statement references (deduplicated)
    pub tables: Vec<String>,
    /// When the operation started
    pub started_at: DateTime<Utc>,
    /// When the operation finished
    pub finished_at: DateTime<Utc>,
}

/// Mutable per-request accumulator, owned by exactly one request scope
#[derive(Debug)]
pub(crate) struct RequestSession {
    pub(crate) request_id: String,
    pub(crate) path: String,
    pub(crate) method: String,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) events: Vec<QueryEvent>,
}

impl RequestSession {
    pub(crate) fn new(request_id: String, path: &str, method: &str) -> Self {
        Self {
            request_id,
            path: path.to_string(),
            method: method.to_string(),
            started_at: Utc::now(),
            events: Vec::new(),
        }
    }

    /// Aggregate all recorded events into a finalized summary.
    ///
    /// Single pass: sum, max, and both category maps come from the same
    /// iteration. An event touching several tables contributes once per
    /// table; one touching none contributes to no table count.
    pub(crate) fn summarize(&self, finished_at: DateTime<Utc>) -> RequestSummary {
        let mut total_cost_ms = 0u64;
        let mut max_cost_ms = 0u64;
        let mut kind_counts: HashMap<StatementKind, u64> = HashMap::new();
        let mut table_counts: HashMap<String, u64> = HashMap::new();

        for event in &self.events {
            total_cost_ms += event.cost_ms;
            max_cost_ms = max_cost_ms.max(event.cost_ms);
            *kind_counts.entry(event.kind).or_insert(0) += 1;
            for table in &event.tables {
                *table_counts.entry(table.clone()).or_insert(0) += 1;
            }
        }

        let total_queries = self.events.len() as u64;
        let average_cost_ms = if total_queries == 0 {
            0.0
        } else {
            total_cost_ms as f64 / total_queries as f64
        };

        RequestSummary {
            request_id: self.request_id.clone(),
            path: self.path.clone(),
            method: self.method.clone(),
            total_queries,
            total_cost_ms,
            average_cost_ms,
            max_cost_ms,
            kind_counts,
            table_counts,
            timestamp: finished_at,
        }
    }
}

/// Finalized, immutable statistics for one completed request.
///
/// Produced exactly once per session; a copy lives in the global history
/// and an independent copy goes back to the finishing caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSummary {
    /// Globally unique request id
    pub request_id: String,
    /// Request path, as supplied by the host
    pub path: String,
    /// Request method, as supplied by the host
    pub method: String,
    /// Number of recorded events
    pub total_queries: u64,
    /// Sum of all event costs, in milliseconds
    pub total_cost_ms: u64,
    /// `total_cost_ms / total_queries`, 0 when no events were recorded
    pub average_cost_ms: f64,
    /// Largest single event cost, in milliseconds
    pub max_cost_ms: u64,
    /// Event count per statement kind
    pub kind_counts: HashMap<StatementKind, u64>,
    /// Event count per referenced table
    pub table_counts: HashMap<String, u64>,
    /// Finalization time
    pub timestamp: DateTime<Utc>,
}

/// Read-only view of an in-progress session, for mid-request debugging
#[derive(Debug, Clone, Serialize)]
pub struct CurrentRequest {
    /// Globally unique request id
    pub request_id: String,
    /// Request path
    pub path: String,
    /// Request method
    pub method: String,
    /// Session creation time
    pub started_at: DateTime<Utc>,
    /// Events recorded so far
    pub events_recorded: u64,
}
