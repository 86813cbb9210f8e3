//! Mock Timer implementation for testing

use crate::platform::{traits::TimerInterface, Result};
use std::vec::Vec;

/// Mock Timer implementation
///
/// Simulated time: delays advance the clock instantly and are recorded, and
/// tests move time forward explicitly with [`MockTimer::advance_ms`].
#[derive(Debug, Default)]
pub struct MockTimer {
    now_us: u64,
    delays_ms: Vec<u32>,
}

impl MockTimer {
    /// Create a new mock timer at time 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock timer starting at `ms`
    pub fn starting_at_ms(ms: u64) -> Self {
        Self {
            now_us: ms * 1000,
            delays_ms: Vec::new(),
        }
    }

    /// Set the current time to an absolute value
    pub fn set_ms(&mut self, ms: u64) {
        self.now_us = ms * 1000;
    }

    /// Advance the current time
    pub fn advance_ms(&mut self, ms: u64) {
        self.now_us += ms * 1000;
    }

    /// Blocking delays requested so far, in call order
    pub fn delays_ms(&self) -> &[u32] {
        &self.delays_ms
    }
}

impl TimerInterface for MockTimer {
    fn delay_ms(&mut self, ms: u32) -> Result<()> {
        self.delays_ms.push(ms);
        self.now_us = self.now_us.wrapping_add(ms as u64 * 1000);
        Ok(())
    }

    fn now_us(&self) -> u64 {
        self.now_us
    }
}
