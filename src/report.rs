//! Derived summary-of-summaries
//!
//! Admin endpoints expose an aggregate view over the retained history:
//! totals, averages, distributions by statement kind and table, and the
//! most recent requests. The report is a pure function of a history
//! snapshot so it composes with [`TelemetryCollector::all`] without
//! holding any lock while aggregating.
//!
//! [`TelemetryCollector::all`]: crate::telemetry::TelemetryCollector::all

use std::collections::HashMap;

use serde::Serialize;

use crate::telemetry::{RequestSummary, StatementKind};

/// Default number of most-recent summaries embedded in a report
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Aggregate statistics over a set of completed requests
#[derive(Debug, Clone, Serialize)]
pub struct OverallReport {
    /// Number of requests aggregated
    pub total_requests: u64,
    /// Total statements across all requests
    pub total_queries: u64,
    /// `total_queries / total_requests`, rounded to 2 decimals
    pub average_queries_per_request: f64,
    /// Sum of all per-request total costs, in milliseconds
    pub total_cost_ms: u64,
    /// Mean of per-request average costs, rounded to 2 decimals
    pub average_cost_ms: f64,
    /// Largest single-statement cost seen in any request
    pub slowest_cost_ms: u64,
    /// Statement counts merged across requests, by kind
    pub kind_distribution: HashMap<StatementKind, u64>,
    /// Statement counts merged across requests, by table
    pub table_distribution: HashMap<String, u64>,
    /// Most recent summaries, newest first
    pub recent: Vec<RequestSummary>,
}

impl OverallReport {
    /// Aggregate a history snapshot.
    ///
    /// An empty snapshot yields an all-zero report with empty
    /// distributions.
    pub fn from_summaries(summaries: &[RequestSummary], recent_limit: usize) -> Self {
        if summaries.is_empty() {
            return Self {
                total_requests: 0,
                total_queries: 0,
                average_queries_per_request: 0.0,
                total_cost_ms: 0,
                average_cost_ms: 0.0,
                slowest_cost_ms: 0,
                kind_distribution: HashMap::new(),
                table_distribution: HashMap::new(),
                recent: Vec::new(),
            };
        }

        let total_requests = summaries.len() as u64;
        let mut total_queries = 0u64;
        let mut total_cost_ms = 0u64;
        let mut average_cost_sum = 0.0f64;
        let mut slowest_cost_ms = 0u64;
        let mut kind_distribution: HashMap<StatementKind, u64> = HashMap::new();
        let mut table_distribution: HashMap<String, u64> = HashMap::new();

        for summary in summaries {
            total_queries += summary.total_queries;
            total_cost_ms += summary.total_cost_ms;
            average_cost_sum += summary.average_cost_ms;
            slowest_cost_ms = slowest_cost_ms.max(summary.max_cost_ms);

            for (kind, count) in &summary.kind_counts {
                *kind_distribution.entry(*kind).or_insert(0) += count;
            }
            for (table, count) in &summary.table_counts {
                *table_distribution.entry(table.clone()).or_insert(0) += count;
            }
        }

        let mut recent: Vec<RequestSummary> = summaries.to_vec();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(recent_limit);

        Self {
            total_requests,
            total_queries,
            average_queries_per_request: round2(total_queries as f64 / total_requests as f64),
            total_cost_ms,
            average_cost_ms: round2(average_cost_sum / total_requests as f64),
            slowest_cost_ms,
            kind_distribution,
            table_distribution,
            recent,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
