/// Deterministic workflow counters.
///
/// Counters must not depend on wall-clock time or unordered iteration;
/// the snapshot comes back in a stable order.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct SearchCounters {
    pub searches_started: u64,
    pub searches_committed: u64,
    pub searches_failed: u64,
    pub stale_responses: u64,
    pub fetch_failures: u64,
}

impl SearchCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stable, sorted-by-construction snapshot suitable for logs/debug UI.
    pub fn snapshot(&self) -> Vec<(&'static str, u64)> {
        vec![
            ("fetch_failures", self.fetch_failures),
            ("searches_committed", self.searches_committed),
            ("searches_failed", self.searches_failed),
            ("searches_started", self.searches_started),
            ("stale_responses", self.stale_responses),
        ]
    }
}
