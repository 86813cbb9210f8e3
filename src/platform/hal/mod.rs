//! `embedded-hal` adapters
//!
//! Bridges the `embedded-hal` 1.0 and `embedded-hal-nb` traits that every
//! modern HAL (embassy-rp, rp235x-hal, esp-hal, ...) implements onto this
//! crate's platform traits. The firmware entry point builds the controller
//! from these wrappers.

mod gpio;
mod serial;
mod timer;

pub use gpio::HalOutput;
pub use serial::HalSerial;
pub use timer::HalTimer;
