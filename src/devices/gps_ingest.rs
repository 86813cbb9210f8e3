//! GPS receive-buffer ingestion
//!
//! Drains every byte the GPS UART has buffered into the sentence decoder, at
//! most once per [`INGEST_INTERVAL_MS`]. A drain is unbounded in length: it
//! runs until the transport reports no more data, so the decoder never sees
//! a gap inside a sentence it could have completed.
//!
//! Starving this step lets the transport FIFO overrun. The decoder then
//! loses sentences until it resynchronizes on the next `$`.

use crate::config::INGEST_INTERVAL_MS;
use crate::core::scheduler::IntervalGate;
use crate::devices::gps::{PositionFix, SentenceDecoder};
use crate::platform::{traits::UartInterface, Result};

/// Read chunk size per UART call
const CHUNK_SIZE: usize = 64;

/// Owns the GPS transport and the decoder fed from it
pub struct PositionIngest<U: UartInterface, D: SentenceDecoder> {
    uart: U,
    decoder: D,
    gate: IntervalGate,
}

impl<U: UartInterface, D: SentenceDecoder> PositionIngest<U, D> {
    /// Create an ingest stage over a GPS UART and a decoder
    pub fn new(uart: U, decoder: D) -> Self {
        Self {
            uart,
            decoder,
            gate: IntervalGate::new(INGEST_INTERVAL_MS),
        }
    }

    /// Drain the GPS transport if the ingest gate is open
    ///
    /// Returns `None` without touching the transport when the last drain was
    /// less than [`INGEST_INTERVAL_MS`] ago, otherwise `Some(bytes_fed)`.
    ///
    /// # Errors
    ///
    /// Returns the transport error if a UART read fails. Bytes read before
    /// the failure have already been fed.
    pub fn drain_available(&mut self, now_ms: u64) -> Result<Option<usize>> {
        if !self.gate.poll(now_ms) {
            return Ok(None);
        }

        let mut buf = [0u8; CHUNK_SIZE];
        let mut total = 0;
        loop {
            let count = self.uart.read(&mut buf)?;
            if count == 0 {
                break;
            }
            for &byte in &buf[..count] {
                self.decoder.feed(byte, now_ms);
            }
            total += count;
        }

        if total > 0 {
            crate::log_trace!("GPS: drained {} bytes", total);
        }
        Ok(Some(total))
    }

    /// Current fix snapshot
    pub fn fix(&self, now_ms: u64) -> PositionFix {
        self.decoder.snapshot(now_ms)
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn decoder_mut(&mut self) -> &mut D {
        &mut self.decoder
    }

    /// Direct access to the GPS transport (tests, receiver setup commands)
    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    pub fn gate(&self) -> &IntervalGate {
        &self.gate
    }
}
