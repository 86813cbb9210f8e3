//! Alert controller firmware for Raspberry Pi Pico 2 W
//!
//! # Hardware
//!
//! - Host link: UART0, TX GPIO0 / RX GPIO1, 9600 baud
//! - GPS receiver: UART1, TX GPIO4 / RX GPIO5, 9600 baud, interrupt-driven
//!   with a 512-byte receive ring
//! - Danger LED GPIO13, safe LED GPIO12, buzzer GPIO11
//!
//! # Usage
//!
//! ```bash
//! cargo build --release --no-default-features --features pico2_w --example pico2_alert
//! ```

#![no_std]
#![no_main]

use alert_beacon::config::ControllerConfig;
use alert_beacon::devices::gps::NmeaDecoder;
use alert_beacon::platform::hal::{HalOutput, HalSerial, HalTimer};
use alert_beacon::{AlertController, AlertPeripherals};
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart, Config as UartConfig, Uart};
use embassy_rp::{bind_interrupts, peripherals::UART1};
use embassy_time::{Delay, Instant};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

/// GPS receive ring; must hold more than one 100 ms ingest interval at
/// 9600 baud (~96 bytes)
const GPS_RX_BUFFER: usize = 512;
const GPS_TX_BUFFER: usize = 32;

static GPS_RX_BUF: StaticCell<[u8; GPS_RX_BUFFER]> = StaticCell::new();
static GPS_TX_BUF: StaticCell<[u8; GPS_TX_BUFFER]> = StaticCell::new();

fn now_us() -> u64 {
    Instant::now().as_micros()
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    let config = ControllerConfig::default();

    let mut host_config = UartConfig::default();
    host_config.baudrate = config.board.host_baud;
    let host = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, host_config);

    let mut gps_config = UartConfig::default();
    gps_config.baudrate = config.board.gps_baud;
    let gps = BufferedUart::new(
        p.UART1,
        p.PIN_4, // TX (GPIO 4)
        p.PIN_5, // RX (GPIO 5)
        Irqs,
        GPS_TX_BUF.init([0; GPS_TX_BUFFER]),
        GPS_RX_BUF.init([0; GPS_RX_BUFFER]),
        gps_config,
    );

    // Pins follow BoardConfig::default(); HalOutput drives them low and caches the level
    let (Ok(danger_led), Ok(safe_led), Ok(buzzer)) = (
        HalOutput::new(Output::new(p.PIN_13, Level::Low)),
        HalOutput::new(Output::new(p.PIN_12, Level::Low)),
        HalOutput::new(Output::new(p.PIN_11, Level::Low)),
    ) else {
        defmt::panic!("Failed to configure alert outputs");
    };

    let peripherals = AlertPeripherals {
        host: HalSerial::new(host),
        gps: HalSerial::new(gps),
        danger_led,
        safe_led,
        buzzer,
        timer: HalTimer::new(Delay, now_us),
    };

    let mut controller = AlertController::new(config, peripherals, NmeaDecoder::new());
    if let Err(e) = controller.start() {
        alert_beacon::log_error!("Startup failed: {}", e);
    }

    alert_beacon::log_info!("Entering alert loop");
    controller.run()
}
