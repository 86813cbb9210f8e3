//! Mock UART implementation for testing

use crate::platform::{
    error::{PlatformError, UartError},
    traits::{UartConfig, UartInterface},
    Result,
};
use std::string::String;
use std::vec::Vec;

/// Mock UART implementation
///
/// Provides in-memory buffers for transmit and receive data,
/// allowing unit tests to verify UART operations without hardware.
///
/// # Example
///
/// ```
/// use alert_beacon::platform::mock::MockUart;
/// use alert_beacon::platform::traits::UartInterface;
///
/// let mut uart = MockUart::new(Default::default());
///
/// uart.write(b"Hello").unwrap();
/// assert_eq!(uart.tx_buffer(), b"Hello");
///
/// uart.inject_rx_data(b"World");
/// let mut buf = [0u8; 5];
/// uart.read(&mut buf).unwrap();
/// assert_eq!(&buf, b"World");
/// ```
#[derive(Debug)]
pub struct MockUart {
    config: UartConfig,
    tx_buffer: Vec<u8>,
    rx_buffer: Vec<u8>,
    bytes_read: usize,
    read_error: Option<UartError>,
    write_error: Option<UartError>,
}

impl MockUart {
    /// Create a new mock UART
    pub fn new(config: UartConfig) -> Self {
        Self {
            config,
            tx_buffer: Vec::new(),
            rx_buffer: Vec::new(),
            bytes_read: 0,
            read_error: None,
            write_error: None,
        }
    }

    /// Get transmitted data (for test verification)
    pub fn tx_buffer(&self) -> &[u8] {
        &self.tx_buffer
    }

    /// Transmitted data as text
    pub fn tx_string(&self) -> String {
        String::from_utf8_lossy(&self.tx_buffer).into_owned()
    }

    /// Take and clear transmitted data as text
    pub fn take_tx_string(&mut self) -> String {
        let text = self.tx_string();
        self.tx_buffer.clear();
        text
    }

    /// Clear transmit buffer
    pub fn clear_tx_buffer(&mut self) {
        self.tx_buffer.clear();
    }

    /// Inject receive data (for test setup)
    pub fn inject_rx_data(&mut self, data: &[u8]) {
        self.rx_buffer.extend_from_slice(data);
    }

    /// Bytes still waiting in the receive buffer
    pub fn rx_pending(&self) -> usize {
        self.rx_buffer.len()
    }

    /// Total bytes consumed through `read`
    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    /// Make the next `read` fail with `error`
    pub fn fail_next_read(&mut self, error: UartError) {
        self.read_error = Some(error);
    }

    /// Fail every `write` with `error` until cleared with `None`
    pub fn set_write_error(&mut self, error: Option<UartError>) {
        self.write_error = error;
    }

    /// Get current baud rate
    pub fn baud_rate(&self) -> u32 {
        self.config.baud_rate
    }
}

impl UartInterface for MockUart {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        if let Some(error) = self.write_error {
            return Err(PlatformError::Uart(error));
        }
        self.tx_buffer.extend_from_slice(data);
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        if let Some(error) = self.read_error.take() {
            return Err(PlatformError::Uart(error));
        }

        let to_read = core::cmp::min(buffer.len(), self.rx_buffer.len());
        buffer[..to_read].copy_from_slice(&self.rx_buffer[..to_read]);
        self.rx_buffer.drain(..to_read);
        self.bytes_read += to_read;

        Ok(to_read)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
