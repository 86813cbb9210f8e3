//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the alert controller.
//! All hardware access goes through the traits defined here.

pub mod error;
pub mod hal;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result};
pub use traits::{GpioInterface, TimerInterface, UartInterface};
