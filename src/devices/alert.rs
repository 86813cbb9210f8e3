//! Alert actuator: danger level to LEDs and buzzer
//!
//! A danger level decides which indicator LED is lit and which buzzer pulse
//! pattern plays. Exactly one of the danger/safe LEDs is on at any time and
//! the buzzer is only driven high inside an active pulse.
//!
//! # Pulse execution
//!
//! Patterns run either from the scheduler tick through [`PulseSequencer`]
//! (non-blocking) or to completion inside [`AlertActuator::apply_blocking`].
//! A newly applied level always replaces a running pattern.

use crate::config::{HIGH_PULSE, MEDIUM_PULSE};
use crate::platform::{traits::GpioInterface, traits::TimerInterface, Result};

/// Danger level decoded from a host command byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DangerLevel {
    /// `'L'`: safe
    #[default]
    Low,
    /// `'M'`
    Medium,
    /// `'H'`
    High,
    /// Any other byte; handled exactly like `Low`
    Unknown,
}

impl DangerLevel {
    /// Decode a command byte. Never fails: unrecognized bytes are `Unknown`.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            b'H' => DangerLevel::High,
            b'M' => DangerLevel::Medium,
            b'L' => DangerLevel::Low,
            _ => DangerLevel::Unknown,
        }
    }

    /// Level that takes effect: `Unknown` acts as `Low`
    pub fn effective(self) -> Self {
        match self {
            DangerLevel::Unknown => DangerLevel::Low,
            level => level,
        }
    }

    /// Whether this level escalates (turns on the alert and forces a report)
    pub fn is_escalation(self) -> bool {
        matches!(self, DangerLevel::High | DangerLevel::Medium)
    }
}

/// Which indicator LED is lit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indicator {
    Safe,
    Danger,
}

/// Buzzer on/off sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulsePattern {
    /// Number of on/off cycles
    pub count: u8,
    /// Buzzer on time per cycle
    pub on_ms: u32,
    /// Silence after each on phase
    pub off_ms: u32,
}

impl PulsePattern {
    /// Wall time for the whole pattern
    pub const fn total_ms(&self) -> u32 {
        self.count as u32 * (self.on_ms + self.off_ms)
    }
}

/// Output state derived from a danger level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlertState {
    pub indicator: Indicator,
    pub pulse: Option<PulsePattern>,
}

impl AlertState {
    /// Map a level to its outputs
    pub fn for_level(level: DangerLevel) -> Self {
        match level {
            DangerLevel::High => AlertState {
                indicator: Indicator::Danger,
                pulse: Some(HIGH_PULSE),
            },
            DangerLevel::Medium => AlertState {
                indicator: Indicator::Danger,
                pulse: Some(MEDIUM_PULSE),
            },
            DangerLevel::Low | DangerLevel::Unknown => AlertState {
                indicator: Indicator::Safe,
                pulse: None,
            },
        }
    }
}

/// Pulse sequencer phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulsePhase {
    Idle,
    /// Buzzer on; `remaining` counts this cycle
    On { remaining: u8, since_ms: u64 },
    /// Buzzer off after an on phase; `remaining` counts this cycle
    Off { remaining: u8, since_ms: u64 },
}

/// Non-blocking buzzer pattern state machine
///
/// Each phase starts at the timestamp where the previous one was observed to
/// end, so a late tick stretches one phase instead of shortening the next.
#[derive(Debug, Clone, Copy)]
pub struct PulseSequencer {
    pattern: PulsePattern,
    phase: PulsePhase,
}

impl Default for PulseSequencer {
    fn default() -> Self {
        Self {
            pattern: PulsePattern {
                count: 0,
                on_ms: 0,
                off_ms: 0,
            },
            phase: PulsePhase::Idle,
        }
    }
}

impl PulseSequencer {
    /// Begin `pattern` at `now_ms`, replacing anything running
    pub fn start(&mut self, pattern: PulsePattern, now_ms: u64) {
        self.pattern = pattern;
        self.phase = if pattern.count == 0 {
            PulsePhase::Idle
        } else {
            PulsePhase::On {
                remaining: pattern.count,
                since_ms: now_ms,
            }
        };
    }

    /// Abort the running pattern
    pub fn cancel(&mut self) {
        self.phase = PulsePhase::Idle;
    }

    /// Advance at most one phase. Returns the buzzer level to drive.
    pub fn advance(&mut self, now_ms: u64) -> bool {
        self.phase = match self.phase {
            PulsePhase::On {
                remaining,
                since_ms,
            } if now_ms.saturating_sub(since_ms) >= self.pattern.on_ms as u64 => PulsePhase::Off {
                remaining,
                since_ms: now_ms,
            },
            PulsePhase::Off {
                remaining,
                since_ms,
            } if now_ms.saturating_sub(since_ms) >= self.pattern.off_ms as u64 => {
                if remaining > 1 {
                    PulsePhase::On {
                        remaining: remaining - 1,
                        since_ms: now_ms,
                    }
                } else {
                    PulsePhase::Idle
                }
            }
            phase => phase,
        };
        self.buzzer_on()
    }

    /// Current phase
    pub fn phase(&self) -> PulsePhase {
        self.phase
    }

    /// Whether the buzzer should currently be on
    pub fn buzzer_on(&self) -> bool {
        matches!(self.phase, PulsePhase::On { .. })
    }

    /// Whether a pattern is still running
    pub fn is_active(&self) -> bool {
        self.phase != PulsePhase::Idle
    }
}

/// Drives the danger LED, safe LED and buzzer
pub struct AlertActuator<P: GpioInterface> {
    danger_led: P,
    safe_led: P,
    buzzer: P,
    level: DangerLevel,
    sequencer: PulseSequencer,
}

impl<P: GpioInterface> AlertActuator<P> {
    /// Create an actuator; call [`AlertActuator::init`] before use
    pub fn new(danger_led: P, safe_led: P, buzzer: P) -> Self {
        Self {
            danger_led,
            safe_led,
            buzzer,
            level: DangerLevel::Low,
            sequencer: PulseSequencer::default(),
        }
    }

    /// Drive the initial safe state: safe LED on, danger LED and buzzer off
    pub fn init(&mut self) -> Result<()> {
        self.sequencer.cancel();
        self.level = DangerLevel::Low;
        self.set_indicator(Indicator::Safe)?;
        self.buzzer.set_low()
    }

    /// Apply `level`, starting its pulse pattern on the sequencer
    pub fn apply(&mut self, level: DangerLevel, now_ms: u64) -> Result<()> {
        let state = self.enter(level)?;
        match state.pulse {
            Some(pattern) => {
                self.sequencer.start(pattern, now_ms);
                self.buzzer.set_level(self.sequencer.buzzer_on())
            }
            None => Ok(()),
        }
    }

    /// Apply `level` and play its pulse pattern to completion
    ///
    /// Blocks for [`PulsePattern::total_ms`] of the level's pattern.
    pub fn apply_blocking<T: TimerInterface>(
        &mut self,
        level: DangerLevel,
        timer: &mut T,
    ) -> Result<()> {
        let state = self.enter(level)?;
        if let Some(pattern) = state.pulse {
            for _ in 0..pattern.count {
                self.buzzer.set_high()?;
                timer.delay_ms(pattern.on_ms)?;
                self.buzzer.set_low()?;
                timer.delay_ms(pattern.off_ms)?;
            }
        }
        Ok(())
    }

    /// Advance a running pulse pattern; call once per scheduler tick
    pub fn service(&mut self, now_ms: u64) -> Result<()> {
        if !self.sequencer.is_active() {
            return Ok(());
        }
        let on = self.sequencer.advance(now_ms);
        if !self.sequencer.is_active() {
            crate::log_debug!("Pulse pattern complete");
        }
        if self.buzzer.read() != on {
            self.buzzer.set_level(on)?;
        }
        Ok(())
    }

    /// Set indicators, silence the buzzer and cancel the running pattern
    fn enter(&mut self, level: DangerLevel) -> Result<AlertState> {
        let state = AlertState::for_level(level);
        self.sequencer.cancel();
        self.buzzer.set_low()?;
        self.set_indicator(state.indicator)?;
        self.level = level.effective();
        Ok(state)
    }

    fn set_indicator(&mut self, indicator: Indicator) -> Result<()> {
        // Turn the old LED off first so both are never lit together
        match indicator {
            Indicator::Danger => {
                self.safe_led.set_low()?;
                self.danger_led.set_high()
            }
            Indicator::Safe => {
                self.danger_led.set_low()?;
                self.safe_led.set_high()
            }
        }
    }

    /// Level in effect after the last applied command
    ///
    /// Unrecognized command bytes read back as [`DangerLevel::Low`].
    pub fn level(&self) -> DangerLevel {
        self.level
    }

    /// Whether the danger indicator is active
    pub fn alert_active(&self) -> bool {
        self.level.is_escalation()
    }

    /// Indicator currently lit
    pub fn indicator(&self) -> Indicator {
        if self.danger_led.read() {
            Indicator::Danger
        } else {
            Indicator::Safe
        }
    }

    pub fn sequencer(&self) -> &PulseSequencer {
        &self.sequencer
    }

    pub fn danger_led(&self) -> &P {
        &self.danger_led
    }

    pub fn safe_led(&self) -> &P {
        &self.safe_led
    }

    pub fn buzzer(&self) -> &P {
        &self.buzzer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockGpio, MockTimer};

    fn actuator() -> AlertActuator<MockGpio> {
        let mut act = AlertActuator::new(
            MockGpio::new_output(),
            MockGpio::new_output(),
            MockGpio::new_output(),
        );
        act.init().unwrap();
        act
    }

    #[test]
    fn test_from_byte() {
        assert_eq!(DangerLevel::from_byte(b'H'), DangerLevel::High);
        assert_eq!(DangerLevel::from_byte(b'M'), DangerLevel::Medium);
        assert_eq!(DangerLevel::from_byte(b'L'), DangerLevel::Low);
        assert_eq!(DangerLevel::from_byte(b'h'), DangerLevel::Unknown);
        assert_eq!(DangerLevel::from_byte(0xFF), DangerLevel::Unknown);
        assert_eq!(DangerLevel::Unknown.effective(), DangerLevel::Low);
        assert_eq!(DangerLevel::High.effective(), DangerLevel::High);
    }

    #[test]
    fn test_unknown_maps_to_safe_state() {
        assert_eq!(
            AlertState::for_level(DangerLevel::Unknown),
            AlertState::for_level(DangerLevel::Low)
        );
    }

    #[test]
    fn test_init_is_safe() {
        let act = actuator();
        assert!(act.safe_led().read());
        assert!(!act.danger_led().read());
        assert!(!act.buzzer().read());
        assert!(!act.alert_active());
    }

    #[test]
    fn test_indicators_mutually_exclusive() {
        let mut act = actuator();
        for (i, byte) in b"HMLxHL?M".iter().enumerate() {
            act.apply(DangerLevel::from_byte(*byte), i as u64 * 10).unwrap();
            assert_ne!(act.danger_led().read(), act.safe_led().read());
        }
    }

    #[test]
    fn test_sequencer_high_pattern_timeline() {
        let mut seq = PulseSequencer::default();
        seq.start(HIGH_PULSE, 0);
        assert!(seq.buzzer_on());

        let mut edges = 0;
        let mut last = true;
        let mut on_since = 0;
        for t in 1..=2000u64 {
            let on = seq.advance(t);
            if on && !last {
                edges += 1;
                on_since = t;
            }
            if !on && last {
                assert_eq!(t - on_since, 200);
            }
            last = on;
        }
        // First activation started at t=0
        assert_eq!(edges + 1, 5);
        assert!(!seq.is_active());
    }

    #[test]
    fn test_sequencer_late_tick_stretches_phase() {
        let mut seq = PulseSequencer::default();
        seq.start(MEDIUM_PULSE, 0);
        assert!(!seq.advance(400));
        assert_eq!(
            seq.phase(),
            PulsePhase::Off {
                remaining: 3,
                since_ms: 400
            }
        );
        assert!(!seq.advance(549));
        assert!(seq.advance(550));
    }

    #[test]
    fn test_apply_high_runs_pattern_via_service() {
        let mut act = actuator();
        act.apply(DangerLevel::High, 0).unwrap();
        assert!(act.alert_active());
        assert!(act.buzzer().read());

        for t in (10..=1600u64).step_by(10) {
            act.service(t).unwrap();
        }
        assert_eq!(act.buzzer().rising_edges(), 5);
        assert!(!act.buzzer().read());
        assert!(!act.sequencer().is_active());
        // Indicators stay in danger after the pattern ends
        assert_eq!(act.indicator(), Indicator::Danger);
    }

    #[test]
    fn test_low_cancels_running_pattern() {
        let mut act = actuator();
        act.apply(DangerLevel::High, 0).unwrap();
        act.service(50).unwrap();
        act.apply(DangerLevel::Low, 60).unwrap();

        assert!(!act.buzzer().read());
        assert!(!act.sequencer().is_active());
        assert_eq!(act.indicator(), Indicator::Safe);
        assert!(!act.alert_active());
    }

    #[test]
    fn test_apply_blocking_delays() {
        let mut act = actuator();
        let mut timer = MockTimer::new();
        act.apply_blocking(DangerLevel::Medium, &mut timer).unwrap();

        assert_eq!(timer.delays_ms(), &[150, 150, 150, 150, 150, 150]);
        assert_eq!(timer.now_ms(), 900);
        assert_eq!(act.buzzer().rising_edges(), 3);
        assert!(!act.buzzer().read());
        assert!(act.alert_active());
    }

    #[test]
    fn test_apply_blocking_low_has_no_delay() {
        let mut act = actuator();
        let mut timer = MockTimer::new();
        act.apply_blocking(DangerLevel::Unknown, &mut timer).unwrap();
        assert!(timer.delays_ms().is_empty());
        assert_eq!(act.level(), DangerLevel::Low);
        assert!(!act.alert_active());
    }
}
