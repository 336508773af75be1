//! Apexcore - Admission Control and Query Telemetry Core
//!
//! The in-process core of the Apex publishing backend's request plumbing:
//! a multi-window in-memory rate limiter for abusive clients and a
//! per-request SQL statement statistics collector with a bounded global
//! history. Both are pure in-memory components invoked from the host's
//! request boundaries; neither can fail a request it observes.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                       request boundary                         │
//! │  allow(client)? ──▶ 429 + quota headers        on deny         │
//! │       │                                                        │
//! │       ▼ on admit                                               │
//! │  begin(path, method) ─▶ RequestScope ─▶ record(stmt) ...       │
//! │       │                                     ▲                  │
//! │       │                       statement inspector (per query)  │
//! │       ▼                                                        │
//! │  finish() ─▶ RequestSummary ─▶ GlobalHistory (FIFO, bounded)   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`admission`] - Sliding-window rate limiter with background sweep
//! - [`telemetry`] - Request-scoped query statistics and bounded history
//! - [`report`] - Aggregate view over the retained history
//! - [`filter`] - Path exclusion rules for the lifecycle hook
//! - [`clock`] - Injectable time source
//! - [`error`] - Error types
//!
//! # Concurrency model
//!
//! Request-scoped state ([`RequestScope`]) is owned by one logical request
//! and needs no locking. Shared state is limited to the client map
//! (per-entry exclusion via the concurrent map) and the history (one
//! short mutex per completed request). No operation blocks on I/O.

pub mod admission;
pub mod clock;
pub mod error;
pub mod filter;
pub mod report;
pub mod telemetry;

// Re-export commonly used types
pub use admission::{AdmissionConfig, AdmissionController, QuotaInfo};
pub use clock::{Clock, SystemClock};
pub use error::{Error, Result};
pub use filter::PathFilter;
pub use report::OverallReport;
pub use telemetry::{
    CostModel, FixedCost, RequestScope, RequestSummary, StatementKind, SyntheticCost,
    TelemetryCollector, TelemetryConfig,
};
