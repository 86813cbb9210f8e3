//! Fixed controller configuration
//!
//! Timing constants and board wiring. Nothing here changes at runtime.

use crate::devices::alert::PulsePattern;

/// Minimum spacing between GPS receive-buffer drains
pub const INGEST_INTERVAL_MS: u64 = 100;

/// Spacing between periodic status reports
pub const REPORT_INTERVAL_MS: u64 = 2000;

/// Below this many decoded characters the report includes a wiring warning
pub const WIRING_CHECK_MIN_CHARS: u32 = 10;

/// Buzzer pattern for a high danger alert: 5 x (200 ms on, 100 ms off)
pub const HIGH_PULSE: PulsePattern = PulsePattern {
    count: 5,
    on_ms: 200,
    off_ms: 100,
};

/// Buzzer pattern for a medium danger alert: 3 x (150 ms on, 150 ms off)
pub const MEDIUM_PULSE: PulsePattern = PulsePattern {
    count: 3,
    on_ms: 150,
    off_ms: 150,
};

/// How the buzzer pulse pattern is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseMode {
    /// Pulses advance from the scheduler tick; GPS ingest keeps running
    NonBlocking,
    /// Pulses run to completion inside command dispatch using timer delays.
    /// GPS bytes arriving meanwhile may overrun the receiver FIFO.
    Blocking,
}

/// Pin and link assignment of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardConfig {
    /// Red LED, lit while an alert is active
    pub danger_led_pin: u8,
    /// Green LED, lit in the safe state
    pub safe_led_pin: u8,
    /// Buzzer drive line
    pub buzzer_pin: u8,
    /// MCU receive pin, wired to the GPS module TX
    pub gps_rx_pin: u8,
    /// MCU transmit pin, wired to the GPS module RX
    pub gps_tx_pin: u8,
    /// Host link baud rate
    pub host_baud: u32,
    /// GPS link baud rate (NEO-6M default)
    pub gps_baud: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            danger_led_pin: 13,
            safe_led_pin: 12,
            buzzer_pin: 11,
            gps_rx_pin: 5,
            gps_tx_pin: 4,
            host_baud: 9600,
            gps_baud: 9600,
        }
    }
}

/// Controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerConfig {
    pub board: BoardConfig,
    pub pulse_mode: PulseMode,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            pulse_mode: PulseMode::NonBlocking,
        }
    }
}

impl ControllerConfig {
    /// Default board with blocking pulse execution
    pub fn blocking() -> Self {
        Self {
            pulse_mode: PulseMode::Blocking,
            ..Self::default()
        }
    }
}
