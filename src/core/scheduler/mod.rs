//! Cooperative scheduling primitives
//!
//! The controller runs a single polling loop. Periodic work is gated by
//! [`IntervalGate`] comparisons against the monotonic clock; nothing sleeps.

pub mod gate;
pub mod stats;

pub use gate::IntervalGate;
pub use stats::{LoopStats, TickSummary};
