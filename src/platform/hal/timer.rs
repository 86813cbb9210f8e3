//! `embedded-hal` delay adapter

use crate::platform::{traits::TimerInterface, Result};
use embedded_hal::delay::DelayNs;

/// Combines a `DelayNs` provider with a monotonic microsecond clock
///
/// On embassy targets `now_us` is typically `|| embassy_time::Instant::now().as_micros()`.
pub struct HalTimer<D: DelayNs> {
    delay: D,
    now_us: fn() -> u64,
}

impl<D: DelayNs> HalTimer<D> {
    /// Create a timer from a delay provider and a clock function
    pub fn new(delay: D, now_us: fn() -> u64) -> Self {
        Self { delay, now_us }
    }
}

impl<D: DelayNs> TimerInterface for HalTimer<D> {
    fn delay_ms(&mut self, ms: u32) -> Result<()> {
        self.delay.delay_ms(ms);
        Ok(())
    }

    fn now_us(&self) -> u64 {
        (self.now_us)()
    }
}
