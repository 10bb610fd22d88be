//! Cache Statistics Module
//!
//! Tracks read, listing, and write outcomes of a reactive cache.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache operation counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Reads answered from the store
    pub read_hits: u64,
    /// Reads of keys that were never loaded
    pub read_misses: u64,
    /// List preloads answered from the list cache
    pub list_hits: u64,
    /// List preloads that went to the store
    pub list_misses: u64,
    /// Writes handed to the write queue
    pub writes_enqueued: u64,
    /// Writes the store acknowledged
    pub writes_completed: u64,
    /// Writes that failed or panicked
    pub writes_failed: u64,
    /// Listings currently cached
    pub cached_lists: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Returns read_hits / (read_hits + read_misses), or 0.0 without reads.
    pub fn hit_rate(&self) -> f64 {
        ratio(self.read_hits, self.read_misses)
    }

    /// Returns the list cache hit rate, or 0.0 without preloads.
    pub fn list_hit_rate(&self) -> f64 {
        ratio(self.list_hits, self.list_misses)
    }

    /// Writes enqueued but not yet finished.
    pub fn pending_writes(&self) -> u64 {
        self.writes_enqueued
            .saturating_sub(self.writes_completed + self.writes_failed)
    }
}

fn ratio(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

// == Stats Recorder ==
/// Lock-free counters shared by the cache and its write queue.
#[derive(Debug, Default)]
pub struct StatsRecorder {
    read_hits: AtomicU64,
    read_misses: AtomicU64,
    list_hits: AtomicU64,
    list_misses: AtomicU64,
    writes_enqueued: AtomicU64,
    writes_completed: AtomicU64,
    writes_failed: AtomicU64,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_read_hit(&self) {
        self.read_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_read_miss(&self) {
        self.read_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_list_hit(&self) {
        self.list_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_list_miss(&self) {
        self.list_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write_enqueued(&self) {
        self.writes_enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write_completed(&self) {
        self.writes_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write_failed(&self) {
        self.writes_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the current counter values.
    pub fn snapshot(&self, cached_lists: usize) -> CacheStats {
        CacheStats {
            read_hits: self.read_hits.load(Ordering::Relaxed),
            read_misses: self.read_misses.load(Ordering::Relaxed),
            list_hits: self.list_hits.load(Ordering::Relaxed),
            list_misses: self.list_misses.load(Ordering::Relaxed),
            writes_enqueued: self.writes_enqueued.load(Ordering::Relaxed),
            writes_completed: self.writes_completed.load(Ordering::Relaxed),
            writes_failed: self.writes_failed.load(Ordering::Relaxed),
            cached_lists,
        }
    }
}
