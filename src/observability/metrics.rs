//! Metrics registry
//!
//! - Counters only (no gauges, no histograms)
//! - Monotonic increase
//! - Thread-safe but lock-minimal

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for one lot
///
/// All counters use Relaxed ordering; a snapshot taken while gates are
/// running is not a consistent cut across counters.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Successful parks
    parks: AtomicU64,
    /// Successful unparks
    unparks: AtomicU64,
    /// Parks that returned an error
    park_failures: AtomicU64,
    /// Claims lost to a concurrent park after a scan
    races_lost: AtomicU64,
    /// Lot resets
    resets: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_parks(&self) {
        self.parks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_unparks(&self) {
        self.unparks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_park_failures(&self) {
        self.park_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_races_lost(&self, count: u64) {
        self.races_lost.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_resets(&self) {
        self.resets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn races_lost(&self) -> u64 {
        self.races_lost.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            parks: self.parks.load(Ordering::Relaxed),
            unparks: self.unparks.load(Ordering::Relaxed),
            park_failures: self.park_failures.load(Ordering::Relaxed),
            races_lost: self.races_lost.load(Ordering::Relaxed),
            resets: self.resets.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub parks: u64,
    pub unparks: u64,
    pub park_failures: u64,
    pub races_lost: u64,
    pub resets: u64,
}
