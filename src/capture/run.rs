//! Capture run bookkeeping: identifiers, state machine, fetch counters.

use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Global counter for generating unique run IDs.
static RUN_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a capture run.
///
/// Run IDs are monotonically increasing and unique within a process
/// lifetime; they correlate log messages across the run's fetch tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(u64);

impl RunId {
    /// Creates a new unique run ID.
    pub fn new() -> Self {
        Self(RUN_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric value of this run ID.
    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

/// State of a capture run.
///
/// Runs move `Planning → Fetching → Composing → Done`, with `Failed`
/// reachable from `Fetching` or `Composing`. `Done` and `Failed` are
/// terminal; the orchestrator never restarts a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Planning the sample grid
    Planning,
    /// Fetching one tile per sample point
    Fetching,
    /// Assembling the composite
    Composing,
    /// Composite produced
    Done,
    /// Run aborted with a typed error
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Planning => "planning",
            RunState::Fetching => "fetching",
            RunState::Composing => "composing",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Counters for one run's fetch phase.
///
/// Shared between fetch tasks via `Arc`; read as a snapshot for the final
/// run log line and for test assertions.
#[derive(Debug, Default)]
pub struct FetchStats {
    attempts: AtomicU32,
    succeeded: AtomicU32,
    retried: AtomicU32,
    failed: AtomicU32,
    cancelled: AtomicU32,
}

impl FetchStats {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_attempt(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retry(&self) {
        self.retried.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cancelled(&self) {
        self.cancelled.fetch_add(1, Ordering::Relaxed);
    }

    /// Total fetch attempts, including retries.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Points fetched successfully.
    pub fn succeeded(&self) -> u32 {
        self.succeeded.load(Ordering::Relaxed)
    }

    /// Retries performed after transient failures.
    pub fn retried(&self) -> u32 {
        self.retried.load(Ordering::Relaxed)
    }

    /// Points that exhausted retries or failed permanently.
    pub fn failed(&self) -> u32 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Fetch tasks abandoned because the run was cancelled.
    pub fn cancelled(&self) -> u32 {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_ids_are_unique_and_increasing() {
        let a = RunId::new();
        let b = RunId::new();
        assert_ne!(a, b);
        assert!(b.as_u64() > a.as_u64());
    }

    #[test]
    fn test_run_id_display() {
        let id = RunId::new();
        assert_eq!(id.to_string(), format!("run-{}", id.as_u64()));
    }

    #[test]
    fn test_run_state_display() {
        assert_eq!(RunState::Planning.to_string(), "planning");
        assert_eq!(RunState::Fetching.to_string(), "fetching");
        assert_eq!(RunState::Composing.to_string(), "composing");
        assert_eq!(RunState::Done.to_string(), "done");
        assert_eq!(RunState::Failed.to_string(), "failed");
    }

    #[test]
    fn test_fetch_stats_counters() {
        let stats = FetchStats::new();
        stats.record_attempt();
        stats.record_attempt();
        stats.record_retry();
        stats.record_success();
        stats.record_failure();
        stats.record_cancelled();

        assert_eq!(stats.attempts(), 2);
        assert_eq!(stats.retried(), 1);
        assert_eq!(stats.succeeded(), 1);
        assert_eq!(stats.failed(), 1);
        assert_eq!(stats.cancelled(), 1);
    }
}
