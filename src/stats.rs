//! Service statistics
//!
//! Process-lifetime counters exposed on `/health` and `/stats`. Created at
//! startup, never persisted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Query counter and start time for the running process
pub struct ServiceStats {
    total_queries: AtomicU64,
    started_at: Instant,
}

impl ServiceStats {
    /// Start tracking from now
    #[must_use]
    pub fn new() -> Self {
        Self {
            total_queries: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    /// Count one `/analyze` call
    pub fn record_query(&self) {
        self.total_queries.fetch_add(1, Ordering::Relaxed);
    }

    /// Total `/analyze` calls since start
    pub fn total_queries(&self) -> u64 {
        self.total_queries.load(Ordering::Relaxed)
    }

    /// Time since start
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Snapshot for the `/stats` endpoint
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_queries: self.total_queries(),
            uptime: self.uptime().as_secs(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

impl Default for ServiceStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Body of `GET /stats`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    /// `/analyze` calls served
    pub total_queries: u64,
    /// Whole seconds since start
    pub uptime: u64,
    /// Crate version
    pub version: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_queries() {
        let stats = ServiceStats::new();
        assert_eq!(stats.total_queries(), 0);
        stats.record_query();
        stats.record_query();
        assert_eq!(stats.total_queries(), 2);
    }

    #[test]
    fn snapshot_uses_camel_case() {
        let stats = ServiceStats::new();
        stats.record_query();
        let json = serde_json::to_value(stats.snapshot()).unwrap();
        assert_eq!(json["totalQueries"], 1);
        assert_eq!(json["uptime"], 0);
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }
}
