//! Mock GPIO implementation for testing

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};
use std::vec::Vec;

/// Mock GPIO implementation
///
/// Tracks pin state and mode, plus the history of level changes so tests can
/// count buzzer activations.
#[derive(Debug)]
pub struct MockGpio {
    state: bool,
    mode: GpioMode,
    transitions: Vec<bool>,
}

impl MockGpio {
    /// Create a new mock GPIO in output mode, driven low
    pub fn new_output() -> Self {
        Self {
            state: false,
            mode: GpioMode::OutputPushPull,
            transitions: Vec::new(),
        }
    }

    /// Create a new mock GPIO in input mode
    pub fn new_input() -> Self {
        Self {
            state: false,
            mode: GpioMode::Input,
            transitions: Vec::new(),
        }
    }

    /// Level changes observed so far, oldest first
    pub fn transitions(&self) -> &[bool] {
        &self.transitions
    }

    /// Number of low-to-high edges observed
    pub fn rising_edges(&self) -> usize {
        self.transitions.iter().filter(|&&high| high).count()
    }

    /// Forget recorded transitions (pin level is kept)
    pub fn clear_history(&mut self) {
        self.transitions.clear();
    }

    fn drive(&mut self, high: bool) -> Result<()> {
        if self.mode != GpioMode::OutputPushPull {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        if self.state != high {
            self.transitions.push(high);
        }
        self.state = high;
        Ok(())
    }
}

impl GpioInterface for MockGpio {
    fn set_high(&mut self) -> Result<()> {
        self.drive(true)
    }

    fn set_low(&mut self) -> Result<()> {
        self.drive(false)
    }

    fn read(&self) -> bool {
        self.state
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}
