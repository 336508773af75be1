//! Per-client request window
//!
//! Arrival times are bucketed to one-second granularity with an occurrence
//! count per bucket, so a burst within the same clock tick costs one map
//! entry rather than one per request. Buckets older than the largest
//! tracked window (one hour) are pruned lazily on access and periodically
//! by the controller's background sweep.

use std::collections::BTreeMap;

/// Seconds covered by the short (burst) window
pub(crate) const MINUTE_WINDOW_SECS: u64 = 60;

/// Seconds covered by the long (sustained-abuse) window
pub(crate) const HOUR_WINDOW_SECS: u64 = 3600;

/// Request arrivals for a single client, bucketed by second.
///
/// Keys are seconds relative to the controller's epoch instant. The map is
/// ordered so pruning and window counting are range operations.
#[derive(Debug, Default)]
pub(crate) struct ClientWindow {
    buckets: BTreeMap<u64, u32>,
}

impl ClientWindow {
    /// Record one arrival in the bucket for `now_secs`
    pub(crate) fn record(&mut self, now_secs: u64) {
        *self.buckets.entry(now_secs).or_insert(0) += 1;
    }

    /// Drop every bucket older than the hour window.
    ///
    /// Keeps buckets at exactly `now - 1h`; they are outside both counting
    /// windows (which are strictly-after) and fall off on the next prune.
    pub(crate) fn prune(&mut self, now_secs: u64) {
        let cutoff = now_secs.saturating_sub(HOUR_WINDOW_SECS);
        self.buckets = self.buckets.split_off(&cutoff);
    }

    /// Number of arrivals strictly after `now - window_secs`.
    ///
    /// When the window reaches past the epoch (the controller is younger
    /// than the window) every bucket counts.
    pub(crate) fn count_within(&self, now_secs: u64, window_secs: u64) -> u64 {
        match now_secs.checked_sub(window_secs) {
            Some(cutoff) => self
                .buckets
                .range(cutoff + 1..)
                .map(|(_, count)| u64::from(*count))
                .sum(),
            None => self.buckets.values().map(|count| u64::from(*count)).sum(),
        }
    }

    /// True when no buckets remain
    pub(crate) fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
