//! Device drivers
//!
//! Drivers built on the platform abstraction traits.
//!
//! ## Modules
//!
//! - `alert`: danger-level LEDs and buzzer pulse patterns
//! - `gps`: NMEA sentence decoder capability and position snapshot
//! - `gps_ingest`: gated draining of the GPS UART into the decoder

pub mod alert;
pub mod gps;
pub mod gps_ingest;
