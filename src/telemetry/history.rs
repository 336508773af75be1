//! Bounded request-summary history
//!
//! FIFO cache keyed by request id. Eviction is strictly by insertion
//! order, never by access recency: admin dashboards poll recent entries
//! constantly and an LRU would keep whatever they happen to look at
//! alive forever. A single mutex guards each insert; inserts happen once
//! per request, not once per event, so contention is negligible.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;

use super::session::RequestSummary;

/// Default number of completed requests retained
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

struct HistoryInner {
    order: VecDeque<String>,
    by_id: HashMap<String, RequestSummary>,
}

/// Bounded FIFO cache of finalized request summaries
pub struct GlobalHistory {
    inner: Mutex<HistoryInner>,
    capacity: usize,
}

impl GlobalHistory {
    /// Create a history bounded at `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(HistoryInner {
                order: VecDeque::with_capacity(capacity),
                by_id: HashMap::with_capacity(capacity),
            }),
            capacity,
        }
    }

    /// Insert a summary, evicting the oldest entries beyond capacity
    pub fn insert(&self, summary: RequestSummary) {
        let mut inner = self.inner.lock();
        inner.order.push_back(summary.request_id.clone());
        inner.by_id.insert(summary.request_id.clone(), summary);

        while inner.order.len() > self.capacity {
            if let Some(evicted) = inner.order.pop_front() {
                inner.by_id.remove(&evicted);
            }
        }
    }

    /// Look up a completed request by id
    pub fn lookup(&self, request_id: &str) -> Option<RequestSummary> {
        self.inner.lock().by_id.get(request_id).cloned()
    }

    /// Snapshot of all retained summaries, oldest first
    pub fn all(&self) -> Vec<RequestSummary> {
        let inner = self.inner.lock();
        inner
            .order
            .iter()
            .filter_map(|id| inner.by_id.get(id).cloned())
            .collect()
    }

    /// Number of retained summaries
    pub fn len(&self) -> usize {
        self.inner.lock().order.len()
    }

    /// True when nothing is retained
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every retained summary
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.order.clear();
        inner.by_id.clear();
    }
}
