//! Store Statistics Module
//!
//! Tracks object-store read metrics: hits, misses and purged entries.

use serde::Serialize;

// == Cache Stats ==
/// Tracks store performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of reads that found a live value
    pub hits: u64,
    /// Number of reads that found nothing (absent or expired)
    pub misses: u64,
    /// Number of expired entries dropped by `purge_expired`
    pub purged: u64,
    /// Entries currently held, including expired ones not yet purged
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Counts one hit.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Counts one miss.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Adds `count` purged entries.
    pub fn record_purged(&mut self, count: usize) {
        self.purged += count as u64;
    }

    /// Replaces the entry count snapshot.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
