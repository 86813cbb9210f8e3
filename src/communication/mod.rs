//! Host link protocol
//!
//! The host link carries single-byte danger commands inbound and
//! line-oriented status text outbound.
//!
//! # Transport
//!
//! - UART, 9600 baud 8N1 (USB-serial bridge on most boards)

pub mod command;
pub mod report;
