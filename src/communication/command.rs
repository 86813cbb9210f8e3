//! Host command channel
//!
//! The host sends one ASCII byte per command with no framing: `H`, `M` or
//! `L`. Every other byte is accepted and decoded as [`DangerLevel::Unknown`],
//! which the actuator treats as safe.
//!
//! At most one byte is consumed per poll. Bytes that arrive faster stay in
//! the UART buffer and are handled on later ticks in arrival order.

use crate::devices::alert::DangerLevel;
use crate::platform::{traits::UartInterface, Result};

/// One decoded host command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    /// Raw byte as received
    pub byte: u8,
    pub level: DangerLevel,
}

impl Command {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            byte,
            level: DangerLevel::from_byte(byte),
        }
    }
}

/// Polls the host UART for pending command bytes
#[derive(Debug, Default)]
pub struct CommandChannel {
    last: Option<Command>,
    received: u32,
}

impl CommandChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one pending byte, if any
    ///
    /// Returns `Ok(None)` when nothing is buffered.
    pub fn poll<U: UartInterface>(&mut self, uart: &mut U) -> Result<Option<Command>> {
        let mut byte = [0u8; 1];
        if uart.read(&mut byte)? == 0 {
            return Ok(None);
        }

        let command = Command::from_byte(byte[0]);
        self.last = Some(command);
        self.received = self.received.wrapping_add(1);
        Ok(Some(command))
    }

    /// Most recent command received
    pub fn last(&self) -> Option<Command> {
        self.last
    }

    /// Total command bytes consumed
    pub fn received(&self) -> u32 {
        self.received
    }
}
