use serde::Serialize;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Default)]
struct InnerMetrics {
    fetches_started: AtomicU64,
    fetches_superseded: AtomicU64,
    pages_applied: AtomicU64,
    failure_count: AtomicU64,
    stale_results: AtomicU64,
    items_appended: AtomicU64,
}

/// Fetch counters for one list. Clones share the same counters.
#[derive(Debug, Clone)]
pub struct FetchMetrics {
    inner: Arc<InnerMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FetchMetricsSnapshot {
    pub fetches_started: u64,
    pub fetches_superseded: u64,
    pub pages_applied: u64,
    pub failure_count: u64,
    pub stale_results: u64,
    pub items_appended: u64,
}

impl FetchMetrics {
    pub fn new() -> Self {
        FetchMetrics {
            inner: Arc::new(InnerMetrics::default()),
        }
    }

    pub fn increment_started(&self) {
        self.inner.fetches_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_superseded(&self) {
        self.inner.fetches_superseded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_page(&self, items: u64) {
        self.inner.pages_applied.fetch_add(1, Ordering::Relaxed);
        self.inner.items_appended.fetch_add(items, Ordering::Relaxed);
    }

    pub fn increment_failures(&self) {
        self.inner.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_stale(&self) {
        self.inner.stale_results.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> FetchMetricsSnapshot {
        FetchMetricsSnapshot {
            fetches_started: self.inner.fetches_started.load(Ordering::Relaxed),
            fetches_superseded: self.inner.fetches_superseded.load(Ordering::Relaxed),
            pages_applied: self.inner.pages_applied.load(Ordering::Relaxed),
            failure_count: self.inner.failure_count.load(Ordering::Relaxed),
            stale_results: self.inner.stale_results.load(Ordering::Relaxed),
            items_appended: self.inner.items_appended.load(Ordering::Relaxed),
        }
    }
}

impl Default for FetchMetrics {
    fn default() -> Self {
        Self::new()
    }
}
