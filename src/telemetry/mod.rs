//! Query Telemetry
//!
//! Per-request accumulation of data-access events with a bounded global
//! history of finalized summaries.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     TelemetryCollector                           │
//! ├──────────────────────────────────────────────────────────────────┤
//! │ begin() ──▶ RequestScope (owned by one request, lock-free)       │
//! │               │ record() / record_timed()                        │
//! │               │   classify kind + tables, attach cost            │
//! │               ▼                                                  │
//! │             finish() ──▶ RequestSummary ──▶ GlobalHistory        │
//! │                                             (FIFO, capacity 100) │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The host's request-lifecycle hook calls
//! [`begin`](TelemetryCollector::begin) at request start (after checking
//! its [`PathFilter`](crate::filter::PathFilter)) and
//! [`finish`](RequestScope::finish) at request end; the persistence
//! boundary's statement inspector calls
//! [`record`](RequestScope::record) once per statement. None of these
//! calls can fail the request they observe: malformed statements classify
//! as `UNKNOWN` with no tables, and an abandoned scope simply drops.

mod classify;
mod collector;
mod cost;
mod history;
mod id;
mod session;

pub use classify::{referenced_tables, statement_kind, StatementKind};
pub use collector::{RequestScope, TelemetryCollector, TelemetryConfig};
pub use cost::{CostModel, FixedCost, SyntheticCost};
pub use history::{GlobalHistory, DEFAULT_HISTORY_CAPACITY};
pub use session::{CurrentRequest, QueryEvent, RequestSummary};

/// Response header names for per-request telemetry.
pub mod headers {
    /// Number of statements executed while handling the request
    pub const QUERY_COUNT: &str = "X-Query-Count";
    /// Total statement cost in milliseconds
    pub const QUERY_TIME: &str = "X-Query-Time";
}
