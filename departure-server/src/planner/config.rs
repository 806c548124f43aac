//! Search configuration for the departure planner.

use std::time::Duration;

/// How the candidate window is scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Walk backward from the latest candidate, one query at a time, and
    /// stop at the first feasible departure.
    #[default]
    FirstFeasible,

    /// Query every candidate (in concurrent batches) and keep the feasible
    /// one with the latest departure.
    Exhaustive,
}

/// Configuration parameters for departure search.
///
/// The `default_*` fields fill in request parameters the caller leaves
/// out; the `max_*` fields bound what a caller may ask for.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Search horizon when the request gives none (hours).
    pub default_horizon_hours: u32,

    /// Spacing between candidate departures when the request gives none (minutes).
    pub default_step_minutes: u32,

    /// Safety margin before the deadline when the request gives none (minutes).
    pub default_buffer_minutes: u32,

    /// IANA zone for deadlines when the request gives none.
    pub default_time_zone: String,

    /// Longest search horizon accepted (hours).
    pub max_horizon_hours: u32,

    /// Most candidate departures a single search may query.
    pub max_candidates: usize,

    /// Upper bound on a single travel-time query (milliseconds).
    pub call_timeout_ms: u64,

    /// Scan strategy.
    pub scan_mode: ScanMode,

    /// Number of candidates queried concurrently in exhaustive mode.
    pub batch_size: usize,
}

impl SearchConfig {
    /// Returns the per-query timeout as a Duration.
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Use the given scan mode.
    pub fn with_scan_mode(mut self, mode: ScanMode) -> Self {
        self.scan_mode = mode;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_horizon_hours: 3,
            default_step_minutes: 10,
            default_buffer_minutes: 5,
            default_time_zone: "Asia/Kolkata".to_string(),
            max_horizon_hours: 24,
            max_candidates: 200,
            call_timeout_ms: 15_000,
            scan_mode: ScanMode::FirstFeasible,
            batch_size: 4,
        }
    }
}
