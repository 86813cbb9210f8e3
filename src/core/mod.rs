//! Core controller infrastructure
//!
//! Logging macros and the cooperative scheduling primitives the alert
//! controller is built on.

pub mod logging;
pub mod scheduler;
