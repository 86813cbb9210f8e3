//! `embedded-hal-nb` serial adapter

use crate::platform::{
    error::{PlatformError, UartError},
    traits::UartInterface,
    Result,
};
use embedded_hal_nb::serial::{Error as _, ErrorKind, Read, Write};

/// Wraps a non-blocking `embedded-hal-nb` serial port as a [`UartInterface`]
///
/// Reads drain the receive FIFO until the port reports `WouldBlock`. A
/// receive error after some bytes were copied is returned by the next read.
/// Writes block per byte until the transmit FIFO accepts it.
pub struct HalSerial<S> {
    serial: S,
    /// Error seen after a partial read, reported on the next read
    pending: Option<UartError>,
}

impl<S> HalSerial<S>
where
    S: Read<u8> + Write<u8>,
{
    /// Wrap an already configured serial port
    pub fn new(serial: S) -> Self {
        Self {
            serial,
            pending: None,
        }
    }

    /// Release the wrapped port
    pub fn into_inner(self) -> S {
        self.serial
    }
}

fn map_kind(kind: ErrorKind) -> UartError {
    match kind {
        ErrorKind::Overrun => UartError::Overrun,
        ErrorKind::FrameFormat => UartError::FramingError,
        ErrorKind::Parity => UartError::ParityError,
        _ => UartError::ReadFailed,
    }
}

impl<S> UartInterface for HalSerial<S>
where
    S: Read<u8> + Write<u8>,
{
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        for &byte in data {
            nb::block!(self.serial.write(byte))
                .map_err(|_| PlatformError::Uart(UartError::WriteFailed))?;
        }
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        if let Some(error) = self.pending.take() {
            return Err(PlatformError::Uart(error));
        }

        let mut count = 0;
        while count < buffer.len() {
            match self.serial.read() {
                Ok(byte) => {
                    buffer[count] = byte;
                    count += 1;
                }
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(e)) => {
                    let error = map_kind(e.kind());
                    // Bytes already copied are still valid; report them first
                    if count > 0 {
                        self.pending = Some(error);
                        break;
                    }
                    return Err(PlatformError::Uart(error));
                }
            }
        }
        Ok(count)
    }

    fn flush(&mut self) -> Result<()> {
        nb::block!(self.serial.flush()).map_err(|_| PlatformError::Uart(UartError::WriteFailed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::vec::Vec;

    #[derive(Default)]
    struct StubSerial {
        rx: VecDeque<core::result::Result<u8, ErrorKind>>,
        tx: Vec<u8>,
    }

    impl embedded_hal_nb::serial::ErrorType for StubSerial {
        type Error = ErrorKind;
    }

    impl Read<u8> for StubSerial {
        fn read(&mut self) -> nb::Result<u8, Self::Error> {
            match self.rx.pop_front() {
                Some(Ok(byte)) => Ok(byte),
                Some(Err(e)) => Err(nb::Error::Other(e)),
                None => Err(nb::Error::WouldBlock),
            }
        }
    }

    impl Write<u8> for StubSerial {
        fn write(&mut self, word: u8) -> nb::Result<(), Self::Error> {
            self.tx.push(word);
            Ok(())
        }

        fn flush(&mut self) -> nb::Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn test_read_stops_at_would_block() {
        let mut stub = StubSerial::default();
        stub.rx.extend([Ok(b'H'), Ok(b'M')]);
        let mut serial = HalSerial::new(stub);

        let mut buf = [0u8; 8];
        assert_eq!(serial.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"HM");
        assert_eq!(serial.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_read_respects_buffer_len() {
        let mut stub = StubSerial::default();
        stub.rx.extend([Ok(b'a'), Ok(b'b'), Ok(b'c')]);
        let mut serial = HalSerial::new(stub);

        let mut one = [0u8; 1];
        assert_eq!(serial.read(&mut one).unwrap(), 1);
        assert_eq!(one[0], b'a');
    }

    #[test]
    fn test_read_error_mapped() {
        let mut stub = StubSerial::default();
        stub.rx.push_back(Err(ErrorKind::Overrun));
        let mut serial = HalSerial::new(stub);

        let mut buf = [0u8; 4];
        assert_eq!(
            serial.read(&mut buf),
            Err(PlatformError::Uart(UartError::Overrun))
        );
    }

    #[test]
    fn test_read_error_after_data_defers() {
        let mut stub = StubSerial::default();
        stub.rx.extend([Ok(b'$'), Err(ErrorKind::Parity)]);
        let mut serial = HalSerial::new(stub);

        let mut buf = [0u8; 4];
        assert_eq!(serial.read(&mut buf).unwrap(), 1);
        assert_eq!(
            serial.read(&mut buf),
            Err(PlatformError::Uart(UartError::ParityError))
        );
        assert_eq!(serial.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_write_all_bytes() {
        let mut serial = HalSerial::new(StubSerial::default());
        assert_eq!(serial.write(b"GPS:WAITING\r\n").unwrap(), 13);
        serial.flush().unwrap();
        assert_eq!(serial.into_inner().tx, b"GPS:WAITING\r\n");
    }
}
