//! `embedded-hal` output pin adapter

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};
use embedded_hal::digital::OutputPin;

/// Wraps any `embedded_hal::digital::OutputPin` as a [`GpioInterface`]
///
/// The driven level is cached so `read` works through a shared reference.
pub struct HalOutput<P: OutputPin> {
    pin: P,
    high: bool,
}

impl<P: OutputPin> HalOutput<P> {
    /// Wrap a pin and drive it low
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio(GpioError::HardwareError)` if the HAL
    /// rejects the initial write.
    pub fn new(mut pin: P) -> Result<Self> {
        pin.set_low()
            .map_err(|_| PlatformError::Gpio(GpioError::HardwareError))?;
        Ok(Self { pin, high: false })
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> GpioInterface for HalOutput<P> {
    fn set_high(&mut self) -> Result<()> {
        self.pin
            .set_high()
            .map_err(|_| PlatformError::Gpio(GpioError::HardwareError))?;
        self.high = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<()> {
        self.pin
            .set_low()
            .map_err(|_| PlatformError::Gpio(GpioError::HardwareError))?;
        self.high = false;
        Ok(())
    }

    fn read(&self) -> bool {
        self.high
    }

    fn mode(&self) -> GpioMode {
        GpioMode::OutputPushPull
    }
}
