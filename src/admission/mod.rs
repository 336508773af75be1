//! Request Admission Control
//!
//! Multi-window in-memory rate limiting for the inbound request boundary.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                    AdmissionController                        │
//! ├───────────────────────────────────────────────────────────────┤
//! │  DashMap<client id, ClientWindow>                             │
//! │  ┌─────────────────────────────┐   two ceilings per decision: │
//! │  │ second-bucketed arrivals    │   - 60 / minute (burst)      │
//! │  │ pruned lazily + by sweep    │   - 1000 / hour (sustained)  │
//! │  └─────────────────────────────┘                              │
//! │            │                                                  │
//! │   background sweep (5 min): prune + drop idle clients         │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The host's request-arrival hook calls
//! [`allow`](AdmissionController::allow) before any business logic runs and
//! answers HTTP 429 on deny, publishing quota headers derived from
//! [`info`](AdmissionController::info) under the [`headers`] names.
//!
//! This component never errors at decision time: `allow` is a plain
//! boolean and denial is deterministic until window occupancy drops.

mod controller;
mod window;

pub use controller::{
    AdmissionConfig, AdmissionController, QuotaInfo, DEFAULT_PER_HOUR_LIMIT,
    DEFAULT_PER_MINUTE_LIMIT, DEFAULT_SWEEP_INTERVAL,
};

/// Response header names for publishing quota state to clients.
///
/// Hosts that surface quota headers should reuse these names rather
/// than invent new ones.
pub mod headers {
    /// Requests left in the current minute window
    pub const REMAINING_MINUTE: &str = "X-RateLimit-Remaining-Minute";
    /// Requests left in the current hour window
    pub const REMAINING_HOUR: &str = "X-RateLimit-Remaining-Hour";
    /// Configured per-minute ceiling
    pub const LIMIT_MINUTE: &str = "X-RateLimit-Limit-Minute";
    /// Configured per-hour ceiling
    pub const LIMIT_HOUR: &str = "X-RateLimit-Limit-Hour";
}
