//! Alert controller main loop
//!
//! One cooperative loop services the host command link, the GPS receiver
//! and the status report. Each [`AlertController::tick`] runs, in order:
//!
//! 1. poll for one host command byte and dispatch it
//! 2. drain the GPS UART into the decoder (gated, 100 ms)
//! 3. emit the periodic status report (gated, 2000 ms)
//! 4. advance the buzzer pulse pattern
//!
//! Dispatch runs before the drain, so a forced report after an escalation
//! shows the decoder state as of the previous tick. A failing step does not
//! skip the steps after it: GPS ingest keeps its cadence even if the host
//! link errors.
//!
//! All state lives in the controller and is touched only from the loop
//! thread. Running parts of it from another thread or interrupt would need
//! explicit synchronization.

use crate::communication::command::{Command, CommandChannel};
use crate::communication::report::{self, StatusReporter};
use crate::config::{ControllerConfig, PulseMode};
use crate::core::scheduler::{LoopStats, TickSummary};
use crate::devices::alert::AlertActuator;
use crate::devices::gps::SentenceDecoder;
use crate::devices::gps_ingest::PositionIngest;
use crate::platform::{
    traits::{GpioInterface, TimerInterface, UartInterface},
    PlatformError, Result,
};

/// Hardware handed to the controller
pub struct AlertPeripherals<H, G, P, T> {
    /// Host command/report link
    pub host: H,
    /// GPS receiver link
    pub gps: G,
    pub danger_led: P,
    pub safe_led: P,
    pub buzzer: P,
    pub timer: T,
}

/// Keep the first error of a tick while letting later steps run
fn keep<T>(first: &mut Option<PlatformError>, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            first.get_or_insert(e);
            None
        }
    }
}

/// Danger alert controller
pub struct AlertController<H, G, D, P, T>
where
    H: UartInterface,
    G: UartInterface,
    D: SentenceDecoder,
    P: GpioInterface,
    T: TimerInterface,
{
    config: ControllerConfig,
    host: H,
    timer: T,
    commands: CommandChannel,
    actuator: AlertActuator<P>,
    ingest: PositionIngest<G, D>,
    reporter: StatusReporter,
    stats: LoopStats,
}

impl<H, G, D, P, T> AlertController<H, G, D, P, T>
where
    H: UartInterface,
    G: UartInterface,
    D: SentenceDecoder,
    P: GpioInterface,
    T: TimerInterface,
{
    /// Assemble a controller; call [`AlertController::start`] before ticking
    pub fn new(config: ControllerConfig, peripherals: AlertPeripherals<H, G, P, T>, decoder: D) -> Self {
        let AlertPeripherals {
            host,
            gps,
            danger_led,
            safe_led,
            buzzer,
            timer,
        } = peripherals;

        Self {
            config,
            host,
            timer,
            commands: CommandChannel::new(),
            actuator: AlertActuator::new(danger_led, safe_led, buzzer),
            ingest: PositionIngest::new(gps, decoder),
            reporter: StatusReporter::new(config.board),
            stats: LoopStats::default(),
        }
    }

    /// Drive the safe state and send the startup banner
    pub fn start(&mut self) -> Result<()> {
        self.actuator.init()?;
        report::send(&mut self.host, report::write_banner)?;
        let board = &self.config.board;
        crate::log_info!(
            "Alert controller started: danger GPIO{} safe GPIO{} buzzer GPIO{} ({:?} pulses)",
            board.danger_led_pin,
            board.safe_led_pin,
            board.buzzer_pin,
            self.config.pulse_mode
        );
        Ok(())
    }

    /// Run forever. Tick errors are logged and the loop continues.
    pub fn run(&mut self) -> ! {
        loop {
            if let Err(e) = self.tick() {
                crate::log_warn!("Tick failed: {}", e);
            }
        }
    }

    /// One pass of the cooperative loop
    ///
    /// # Errors
    ///
    /// Returns the first platform error raised during the tick. Every step
    /// still runs.
    pub fn tick(&mut self) -> Result<TickSummary> {
        let mut summary = TickSummary::default();
        let mut first_error = None;

        if let Some(Some(command)) = keep(&mut first_error, self.commands.poll(&mut self.host)) {
            summary.command = Some(command.byte);
            summary.forced_report =
                keep(&mut first_error, self.dispatch(command)).unwrap_or(false);
        }

        // Re-read: a blocking pulse pattern may have taken over a second
        let now_ms = self.timer.now_ms();

        summary.ingested = keep(&mut first_error, self.ingest.drain_available(now_ms)).flatten();

        let fix = self.ingest.fix(now_ms);
        summary.periodic_report = keep(
            &mut first_error,
            self.reporter.emit_periodic(now_ms, &fix, &mut self.host),
        )
        .unwrap_or(false);

        keep(&mut first_error, self.actuator.service(now_ms));

        match first_error {
            None => {
                self.stats.record(&summary);
                Ok(summary)
            }
            Some(e) => {
                self.stats.record_error();
                Err(e)
            }
        }
    }

    /// Apply a command byte as if it had arrived from the host
    ///
    /// Returns whether a forced status report was sent.
    pub fn handle_signal(&mut self, byte: u8) -> Result<bool> {
        self.dispatch(Command::from_byte(byte))
    }

    fn dispatch(&mut self, command: Command) -> Result<bool> {
        let level = command.level;
        crate::log_info!("Command {}: {:?}", command.byte, level);

        // Host link failures never keep the outputs from changing
        let mut first_error = None;
        keep(
            &mut first_error,
            report::send(&mut self.host, |out| report::write_alert_notice(out, level)),
        );

        let applied = match self.config.pulse_mode {
            PulseMode::NonBlocking => self.actuator.apply(level, self.timer.now_ms()),
            PulseMode::Blocking => self.actuator.apply_blocking(level, &mut self.timer),
        };
        keep(&mut first_error, applied);

        let mut forced = false;
        if level.is_escalation() {
            // Forced report; the periodic schedule is left untouched
            let now_ms = self.timer.now_ms();
            let fix = self.ingest.fix(now_ms);
            forced = keep(&mut first_error, self.reporter.emit(&fix, &mut self.host)).is_some();
            crate::log_debug!("Forced status report at {} ms", now_ms);
        }

        match first_error {
            None => Ok(forced),
            Some(e) => Err(e),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    pub fn actuator(&self) -> &AlertActuator<P> {
        &self.actuator
    }

    pub fn commands(&self) -> &CommandChannel {
        &self.commands
    }

    pub fn ingest(&self) -> &PositionIngest<G, D> {
        &self.ingest
    }

    pub fn ingest_mut(&mut self) -> &mut PositionIngest<G, D> {
        &mut self.ingest
    }

    pub fn reporter(&self) -> &StatusReporter {
        &self.reporter
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::alert::{DangerLevel, Indicator};
    use crate::devices::gps::{MockDecoder, PositionFix};
    use crate::platform::error::UartError;
    use crate::platform::mock::{MockGpio, MockTimer, MockUart};
    use crate::platform::traits::UartConfig;

    type TestController = AlertController<MockUart, MockUart, MockDecoder, MockGpio, MockTimer>;

    fn controller(config: ControllerConfig) -> TestController {
        let peripherals = AlertPeripherals {
            host: MockUart::new(UartConfig::default()),
            gps: MockUart::new(UartConfig::default()),
            danger_led: MockGpio::new_output(),
            safe_led: MockGpio::new_output(),
            buzzer: MockGpio::new_output(),
            timer: MockTimer::new(),
        };
        let mut ctrl = AlertController::new(config, peripherals, MockDecoder::new());
        ctrl.start().unwrap();
        ctrl.host_mut().clear_tx_buffer();
        ctrl
    }

    #[test]
    fn test_start_banner_and_safe_state() {
        let peripherals = AlertPeripherals {
            host: MockUart::new(UartConfig::default()),
            gps: MockUart::new(UartConfig::default()),
            danger_led: MockGpio::new_output(),
            safe_led: MockGpio::new_output(),
            buzzer: MockGpio::new_output(),
            timer: MockTimer::new(),
        };
        let mut ctrl: TestController =
            AlertController::new(ControllerConfig::default(), peripherals, MockDecoder::new());
        ctrl.start().unwrap();

        let out = ctrl.host().tx_string();
        assert_eq!(out.lines().count(), 3);
        assert!(out.contains("Alert System Ready!"));
        assert!(ctrl.actuator().safe_led().read());
        assert!(!ctrl.actuator().danger_led().read());
    }

    #[test]
    fn test_idle_tick_does_nothing() {
        let mut ctrl = controller(ControllerConfig::default());
        let summary = ctrl.tick().unwrap();
        assert_eq!(summary, TickSummary::default());
        assert!(ctrl.host().tx_buffer().is_empty());
        assert_eq!(ctrl.stats().ticks, 1);
    }

    #[test]
    fn test_escalation_forces_report() {
        let mut ctrl = controller(ControllerConfig::default());
        ctrl.host_mut().inject_rx_data(b"M");

        let summary = ctrl.tick().unwrap();
        assert_eq!(summary.command, Some(b'M'));
        assert!(summary.forced_report);
        assert!(!summary.periodic_report);

        let out = ctrl.host_mut().take_tx_string();
        assert!(out.starts_with("MEDIUM DANGER DETECTED!\r\nGPS:WAITING\r\n"));
        assert!(ctrl.actuator().alert_active());
        assert_eq!(ctrl.stats().forced_reports, 1);
    }

    #[test]
    fn test_low_sends_nothing() {
        let mut ctrl = controller(ControllerConfig::default());
        assert!(!ctrl.handle_signal(b'L').unwrap());
        assert!(ctrl.host().tx_buffer().is_empty());
        assert_eq!(ctrl.actuator().indicator(), Indicator::Safe);
    }

    #[test]
    fn test_forced_report_sees_previous_tick_state() {
        let mut ctrl = controller(ControllerConfig::default());
        ctrl.timer_mut().set_ms(100);
        ctrl.ingest_mut().uart_mut().inject_rx_data(b"0123456789AB");
        ctrl.host_mut().inject_rx_data(b"H");

        // The command dispatches before this tick drains the 12 GPS bytes
        ctrl.tick().unwrap();
        let out = ctrl.host_mut().take_tx_string();
        assert!(out.contains("Chars processed: 0 |"));
        assert_eq!(ctrl.ingest().decoder().fed().len(), 12);
    }

    #[test]
    fn test_host_error_does_not_starve_ingest() {
        let mut ctrl = controller(ControllerConfig::default());
        ctrl.timer_mut().set_ms(100);
        ctrl.ingest_mut().uart_mut().inject_rx_data(b"$GPGGA");
        ctrl.host_mut().fail_next_read(UartError::FramingError);

        assert_eq!(
            ctrl.tick(),
            Err(PlatformError::Uart(UartError::FramingError))
        );
        assert_eq!(ctrl.ingest().decoder().fed(), b"$GPGGA");
        assert_eq!(ctrl.stats().tick_errors, 1);
    }

    #[test]
    fn test_host_write_failure_still_actuates() {
        let mut ctrl = controller(ControllerConfig::default());
        ctrl.host_mut().inject_rx_data(b"H");
        ctrl.host_mut().set_write_error(Some(UartError::WriteFailed));

        assert_eq!(
            ctrl.tick(),
            Err(PlatformError::Uart(UartError::WriteFailed))
        );
        assert_eq!(ctrl.actuator().indicator(), Indicator::Danger);
        assert!(ctrl.actuator().alert_active());
        assert!(ctrl.actuator().buzzer().read());
        assert_eq!(ctrl.commands().received(), 1);
    }

    #[test]
    fn test_write_failure_in_blocking_mode_plays_pattern() {
        let mut ctrl = controller(ControllerConfig::blocking());
        ctrl.host_mut().set_write_error(Some(UartError::WriteFailed));

        assert!(ctrl.handle_signal(b'M').is_err());
        assert_eq!(ctrl.actuator().buzzer().rising_edges(), 3);
        assert!(ctrl.actuator().alert_active());
    }

    #[test]
    fn test_blocking_mode_runs_pulses_in_dispatch() {
        let mut ctrl = controller(ControllerConfig::blocking());
        ctrl.host_mut().inject_rx_data(b"H");

        let summary = ctrl.tick().unwrap();
        assert!(summary.forced_report);
        assert_eq!(ctrl.timer().delays_ms().len(), 10);
        assert_eq!(ctrl.timer().now_ms(), 1500);
        assert_eq!(ctrl.actuator().buzzer().rising_edges(), 5);
        assert!(!ctrl.actuator().buzzer().read());
        // Clock moved past the ingest gate during the pattern
        assert_eq!(summary.ingested, Some(0));
    }

    #[test]
    fn test_valid_fix_in_periodic_report() {
        let mut ctrl = controller(ControllerConfig::default());
        let fix = PositionFix {
            latitude: 37.123456,
            longitude: -122.654321,
            valid: true,
            satellites: 7,
            hdop: 120,
            age_ms: Some(50),
            ..PositionFix::default()
        };
        ctrl.ingest_mut().decoder_mut().set_fix(fix);
        ctrl.timer_mut().set_ms(2000);

        let summary = ctrl.tick().unwrap();
        assert!(summary.periodic_report);
        assert_eq!(
            ctrl.host().tx_string(),
            "GPS:37.123456,-122.654321\r\nSatellites: 7 | HDOP: 120 | Age: 50ms\r\n"
        );
        assert_eq!(ctrl.actuator().level(), DangerLevel::Low);
    }
}
