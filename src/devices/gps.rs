//! GPS sentence decoding (NMEA protocol)
//!
//! The controller treats the NMEA parser as an external capability: bytes go
//! in through [`SentenceDecoder::feed`], and a read-only [`PositionFix`]
//! snapshot comes out. [`NmeaDecoder`] is the production implementation on
//! top of the `nmea0183` crate.
//!
//! # Example
//!
//! ```
//! use alert_beacon::devices::gps::{NmeaDecoder, SentenceDecoder};
//!
//! let mut decoder = NmeaDecoder::new();
//! for &byte in b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n" {
//!     decoder.feed(byte, 1_000);
//! }
//!
//! let fix = decoder.snapshot(1_050);
//! assert!(fix.valid);
//! assert_eq!(fix.satellites, 8);
//! assert_eq!(fix.age_ms, Some(50));
//! ```

use nmea0183::{ParseResult, Parser};

/// Snapshot of the decoder's position and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionFix {
    /// Latitude in degrees (-90 to +90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to +180)
    pub longitude: f64,
    /// Whether the last position-bearing sentence carried a fix
    pub valid: bool,
    /// Satellites used in the last GGA fix
    pub satellites: u8,
    /// Horizontal dilution of precision in hundredths (1.2 reads 120)
    pub hdop: u32,
    /// Milliseconds since the fix was last updated; `None` before the first fix
    pub age_ms: Option<u64>,
    /// Bytes fed into the decoder
    pub chars_processed: u32,
    /// Sentences that updated the fix
    pub sentences_with_fix: u32,
    /// Sentences rejected by the parser (bad checksum or malformed)
    pub failed_sentences: u32,
}

/// Byte-sink interface to a positioning-sentence decoder
pub trait SentenceDecoder {
    /// Feed one received byte; `now_ms` stamps a fix completed by this byte
    fn feed(&mut self, byte: u8, now_ms: u64);

    /// Current fix and diagnostics, with the age computed against `now_ms`
    fn snapshot(&self, now_ms: u64) -> PositionFix;
}

/// NMEA decoder combining GGA and RMC sentences
///
/// - **GGA**: position, satellite count, HDOP
/// - **RMC**: position
///
/// A GGA or RMC sentence without a fix marks the position invalid until the
/// next sentence that carries one.
pub struct NmeaDecoder {
    parser: Parser,
    latitude: f64,
    longitude: f64,
    valid: bool,
    satellites: u8,
    hdop: u32,
    fix_at_ms: Option<u64>,
    chars_processed: u32,
    sentences_with_fix: u32,
    failed_sentences: u32,
}

impl Default for NmeaDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl NmeaDecoder {
    /// Create a decoder accepting every talker and sentence type
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
            latitude: 0.0,
            longitude: 0.0,
            valid: false,
            satellites: 0,
            hdop: 0,
            fix_at_ms: None,
            chars_processed: 0,
            sentences_with_fix: 0,
            failed_sentences: 0,
        }
    }

    fn update_from_gga(&mut self, gga: &nmea0183::GGA, now_ms: u64) {
        self.latitude = gga.latitude.as_f64();
        self.longitude = gga.longitude.as_f64();
        self.satellites = gga.sat_in_use;
        self.hdop = libm::roundf(gga.hdop * 100.0) as u32;
        self.mark_fix(now_ms);
    }

    fn update_from_rmc(&mut self, rmc: &nmea0183::RMC, now_ms: u64) {
        self.latitude = rmc.latitude.as_f64();
        self.longitude = rmc.longitude.as_f64();
        self.mark_fix(now_ms);
    }

    fn mark_fix(&mut self, now_ms: u64) {
        self.valid = true;
        self.fix_at_ms = Some(now_ms);
        self.sentences_with_fix = self.sentences_with_fix.wrapping_add(1);
    }
}

impl SentenceDecoder for NmeaDecoder {
    fn feed(&mut self, byte: u8, now_ms: u64) {
        self.chars_processed = self.chars_processed.wrapping_add(1);

        let Some(result) = self.parser.parse_from_byte(byte) else {
            return;
        };
        match result {
            Ok(ParseResult::GGA(Some(gga))) => self.update_from_gga(&gga, now_ms),
            Ok(ParseResult::RMC(Some(rmc))) => self.update_from_rmc(&rmc, now_ms),
            // Parsed, but the receiver reports no fix
            Ok(ParseResult::GGA(None)) | Ok(ParseResult::RMC(None)) => self.valid = false,
            // Other sentence types carry nothing we report
            Ok(_) => {}
            Err(_) => self.failed_sentences = self.failed_sentences.wrapping_add(1),
        }
    }

    fn snapshot(&self, now_ms: u64) -> PositionFix {
        PositionFix {
            latitude: self.latitude,
            longitude: self.longitude,
            valid: self.valid,
            satellites: self.satellites,
            hdop: self.hdop,
            age_ms: self.fix_at_ms.map(|at| now_ms.saturating_sub(at)),
            chars_processed: self.chars_processed,
            sentences_with_fix: self.sentences_with_fix,
            failed_sentences: self.failed_sentences,
        }
    }
}

/// Scripted decoder for loop tests
///
/// Records every byte it is fed and reports a caller-supplied fix, with
/// `chars_processed` raised by the number of bytes fed.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Default)]
pub struct MockDecoder {
    fix: PositionFix,
    fed: std::vec::Vec<u8>,
}

#[cfg(any(test, feature = "mock"))]
impl MockDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `fix` from now on
    pub fn set_fix(&mut self, fix: PositionFix) {
        self.fix = fix;
    }

    /// Every byte fed so far
    pub fn fed(&self) -> &[u8] {
        &self.fed
    }
}

#[cfg(any(test, feature = "mock"))]
impl SentenceDecoder for MockDecoder {
    fn feed(&mut self, byte: u8, _now_ms: u64) {
        self.fed.push(byte);
    }

    fn snapshot(&self, _now_ms: u64) -> PositionFix {
        PositionFix {
            chars_processed: self.fix.chars_processed + self.fed.len() as u32,
            ..self.fix
        }
    }
}
