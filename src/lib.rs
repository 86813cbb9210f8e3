#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! alert_beacon - Danger-level alert controller for Raspberry Pi Pico 2 W
//!
//! A host sends single-byte danger levels over UART. The controller drives
//! two indicator LEDs and a buzzer pulse pattern, decodes NMEA from a GPS
//! receiver on a second UART, and reports the position back to the host.

// Platform abstraction layer (GPIO, UART, timer)
pub mod platform;

// Indicator outputs and GPS decoding
pub mod devices;

// Logging and loop scheduling primitives
pub mod core;

// Host command and report protocol
pub mod communication;

pub mod config;
pub mod controller;

pub use controller::{AlertController, AlertPeripherals};
