use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Interception counters, shared between the control loop and status readers.
#[derive(Clone, Default)]
pub struct DnsStats {
    queries: Arc<AtomicU64>,
    blocked: Arc<AtomicU64>,
    cache_hits: Arc<AtomicU64>,
    forwarded: Arc<AtomicU64>,
    forward_dropped: Arc<AtomicU64>,
    upstream_answers: Arc<AtomicU64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DnsStatsSnapshot {
    pub queries: u64,
    pub blocked: u64,
    pub cache_hits: u64,
    pub forwarded: u64,
    pub forward_dropped: u64,
    pub upstream_answers: u64,
}

impl DnsStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_query(&self) {
        self.queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_blocked(&self) {
        self.blocked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_forwarded(&self) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_forward_dropped(&self) {
        self.forward_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_upstream_answer(&self) {
        self.upstream_answers.fetch_add(1, Ordering::Relaxed);
    }

    pub fn queries(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    pub fn blocked(&self) -> u64 {
        self.blocked.load(Ordering::Relaxed)
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> DnsStatsSnapshot {
        DnsStatsSnapshot {
            queries: self.queries(),
            blocked: self.blocked(),
            cache_hits: self.cache_hits(),
            forwarded: self.forwarded.load(Ordering::Relaxed),
            forward_dropped: self.forward_dropped.load(Ordering::Relaxed),
            upstream_answers: self.upstream_answers.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for DnsStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsStats")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}
