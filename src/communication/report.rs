//! Host line protocol: status reports and notices
//!
//! Everything the controller tells the host is CRLF-terminated ASCII text.
//!
//! Valid fix:
//! ```text
//! GPS:37.123456,-122.654321
//! Satellites: 7 | HDOP: 120 | Age: 50ms
//! ```
//!
//! No fix:
//! ```text
//! GPS:WAITING
//! Satellites: 0 | Chars processed: 3 | Sentences with fix: 0
//! ```
//! followed by a wiring warning while fewer than
//! [`WIRING_CHECK_MIN_CHARS`] characters have been decoded.
//!
//! Reports are rendered into a fixed [`heapless::String`] and sent with a
//! single UART write.

use core::fmt::{self, Write};

use crate::config::{BoardConfig, REPORT_INTERVAL_MS, WIRING_CHECK_MIN_CHARS};
use crate::core::scheduler::IntervalGate;
use crate::devices::alert::DangerLevel;
use crate::devices::gps::PositionFix;
use crate::platform::{traits::UartInterface, Result};

/// Capacity of one rendered message (largest is a report with warning)
pub const MESSAGE_CAPACITY: usize = 512;

/// Line terminator expected by serial consoles
const EOL: &str = "\r\n";

/// Rendered outbound message
pub type Message = heapless::String<MESSAGE_CAPACITY>;

/// Write the fix report for `fix`
pub fn write_report<W: Write>(out: &mut W, fix: &PositionFix, board: &BoardConfig) -> fmt::Result {
    if fix.valid {
        write!(out, "GPS:{:.6},{:.6}{}", fix.latitude, fix.longitude, EOL)?;
        write!(
            out,
            "Satellites: {} | HDOP: {} | Age: {}ms{}",
            fix.satellites,
            fix.hdop,
            fix.age_ms.unwrap_or_default(),
            EOL
        )
    } else {
        write!(out, "GPS:WAITING{}", EOL)?;
        write!(
            out,
            "Satellites: {} | Chars processed: {} | Sentences with fix: {}{}",
            fix.satellites, fix.chars_processed, fix.sentences_with_fix, EOL
        )?;
        if fix.chars_processed < WIRING_CHECK_MIN_CHARS {
            write_wiring_warning(out, board)?;
        }
        Ok(())
    }
}

/// Five-line hint printed when the GPS link looks dead
pub fn write_wiring_warning<W: Write>(out: &mut W, board: &BoardConfig) -> fmt::Result {
    write!(out, "WARNING: No GPS data received! Check wiring:{}", EOL)?;
    write!(out, "  - GPS TX -> GPIO {}{}", board.gps_rx_pin, EOL)?;
    write!(out, "  - GPS RX -> GPIO {}{}", board.gps_tx_pin, EOL)?;
    write!(out, "  - GPS VCC -> 3V3/5V{}", EOL)?;
    write!(out, "  - GPS GND -> GND{}", EOL)
}

/// Startup banner
pub fn write_banner<W: Write>(out: &mut W) -> fmt::Result {
    write!(out, "Alert System Ready!{}", EOL)?;
    write!(out, "GPS: Acquiring satellites...{}", EOL)?;
    write!(
        out,
        "IMPORTANT: Place GPS module near window with clear sky view{}",
        EOL
    )
}

/// Notice sent before an escalation's pulse pattern
///
/// Safe levels produce no output.
pub fn write_alert_notice<W: Write>(out: &mut W, level: DangerLevel) -> fmt::Result {
    match level {
        DangerLevel::High => write!(out, "HIGH DANGER DETECTED!{}", EOL),
        DangerLevel::Medium => write!(out, "MEDIUM DANGER DETECTED!{}", EOL),
        DangerLevel::Low | DangerLevel::Unknown => Ok(()),
    }
}

/// Render with `f` and send the result in one write
///
/// A message that overflows [`MESSAGE_CAPACITY`] is sent truncated.
pub fn send<U, F>(uart: &mut U, f: F) -> Result<()>
where
    U: UartInterface,
    F: FnOnce(&mut Message) -> fmt::Result,
{
    let mut message = Message::new();
    if f(&mut message).is_err() {
        crate::log_warn!("Host message truncated at {} bytes", message.len());
    }
    if message.is_empty() {
        return Ok(());
    }
    uart.write(message.as_bytes())?;
    Ok(())
}

/// Periodic and on-demand fix reporting
pub struct StatusReporter {
    board: BoardConfig,
    gate: IntervalGate,
}

impl StatusReporter {
    pub fn new(board: BoardConfig) -> Self {
        Self {
            board,
            gate: IntervalGate::new(REPORT_INTERVAL_MS),
        }
    }

    /// Emit a report if [`REPORT_INTERVAL_MS`] has passed since the last
    /// periodic one. Returns whether a report was sent.
    pub fn emit_periodic<U: UartInterface>(
        &mut self,
        now_ms: u64,
        fix: &PositionFix,
        uart: &mut U,
    ) -> Result<bool> {
        if !self.gate.poll(now_ms) {
            return Ok(false);
        }
        self.emit(fix, uart)?;
        Ok(true)
    }

    /// Emit a report now. Does not move the periodic schedule.
    pub fn emit<U: UartInterface>(&self, fix: &PositionFix, uart: &mut U) -> Result<()> {
        send(uart, |out| write_report(out, fix, &self.board))
    }

    pub fn gate(&self) -> &IntervalGate {
        &self.gate
    }
}
