//! Elapsed-time gate for periodic activities
//!
//! Each periodic activity (GPS ingest, status report) owns one gate. The gate
//! fires when `now - last_run >= interval` and then records `last_run = now`.
//! Re-arming from `now` rather than `last_run + interval` keeps a late tick
//! from triggering a burst of catch-up runs.

/// Last-run timestamp compared against a fixed interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntervalGate {
    interval_ms: u64,
    last_run_ms: u64,
}

impl IntervalGate {
    /// Create a gate that last ran at time 0
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_run_ms: 0,
        }
    }

    /// Whether the interval has elapsed, without consuming it
    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_run_ms) >= self.interval_ms
    }

    /// Fire if due, re-arming from `now_ms`
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if self.is_due(now_ms) {
            self.last_run_ms = now_ms;
            true
        } else {
            false
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn last_run_ms(&self) -> u64 {
        self.last_run_ms
    }
}
