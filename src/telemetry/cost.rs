//! Cost attribution for instrumented operations
//!
//! Hosts that time their own statements report real durations through
//! [`RequestScope::record_timed`](super::RequestScope::record_timed); that
//! is the intended contract. [`CostModel`] covers the untimed
//! [`record`](super::RequestScope::record) path: [`SyntheticCost`]
//! fabricates a pseudo-random 1-100ms cost per statement for hosts that
//! cannot measure, and [`FixedCost`] makes aggregation deterministic in
//! tests.

use rand::Rng;

/// Synthesizes a cost for an operation the host did not time itself
pub trait CostModel: Send + Sync {
    /// Cost in milliseconds attributed to `description`
    fn synthesize(&self, description: &str) -> u64;
}

/// Uniform pseudo-random cost in 1..=100 ms
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntheticCost;

impl CostModel for SyntheticCost {
    fn synthesize(&self, _description: &str) -> u64 {
        rand::thread_rng().gen_range(1..=100)
    }
}

/// Constant cost (for deterministic tests)
#[derive(Debug, Clone, Copy)]
pub struct FixedCost(pub u64);

impl CostModel for FixedCost {
    fn synthesize(&self, _description: &str) -> u64 {
        self.0
    }
}
