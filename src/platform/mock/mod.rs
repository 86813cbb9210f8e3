//! Mock platform implementation for testing
//!
//! This module provides mock implementations of platform traits that can be used
//! for unit testing without requiring actual hardware.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! # Example
//!
//! ```
//! use alert_beacon::platform::mock::{MockGpio, MockUart};
//! use alert_beacon::platform::traits::{GpioInterface, UartInterface};
//!
//! let mut led = MockGpio::new_output();
//! led.set_high().unwrap();
//!
//! let mut uart = MockUart::new(Default::default());
//! uart.write(b"test").unwrap();
//! ```

#![cfg(any(test, feature = "mock"))]

mod gpio;
mod timer;
mod uart;

pub use gpio::MockGpio;
pub use timer::MockTimer;
pub use uart::MockUart;
