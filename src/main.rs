//! Rig firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                      │
//! │                                                              │
//! │  RigPins (GPIO)   SystemClock (TimeSource)                   │
//! │  SerialEventSink (EventSink, record stream on stdout)        │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │   Rig (pure timing logic)                           │      │
//! │  │   Supervisor · Station A · Station B · Blink        │      │
//! │  └────────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! One session per power cycle: boot, wait out the start delay, run the
//! session, force every valve closed, then halt until power-cycled.
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info};

use rigfw::adapters::gpio::RigPins;
use rigfw::adapters::serial_sink::SerialEventSink;
use rigfw::adapters::time::SystemClock;
use rigfw::app::service::{Rig, Station};
use rigfw::clock::TimeSource;
use rigfw::config::RigConfig;
use rigfw::drivers::status_led::StatusLed;
use rigfw::drivers::watchdog::Watchdog;
use rigfw::events::Side;
use rigfw::session::halt;

/// Longest the tick loop may stall before the TWDT resets the chip.
const WATCHDOG_TIMEOUT_MS: u32 = 5_000;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  rigfw v{}                          ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = RigConfig::default();
    config.validate()?;
    info!("Config: {}", config.to_json()?);
    info!(
        "Console at {} baud; tick counter wraps every {} s",
        config.baud_rate,
        config.resolution.wrap_period_secs()
    );

    // ── 3. Hardware ───────────────────────────────────────────
    let mut clock = SystemClock::new(config.resolution);
    let power_on = clock.now();

    let pins = RigPins::take()?;
    let side_a = Station::from_pins(
        Side::A,
        pins.side_a.ir,
        pins.side_a.touch,
        pins.side_a.solenoid,
        &config,
        power_on,
    )?;
    let side_b = Station::from_pins(
        Side::B,
        pins.side_b.ir,
        pins.side_b.touch,
        pins.side_b.solenoid,
        &config,
        power_on,
    )?;
    let runtime_led = StatusLed::new(pins.led_runtime, config.led_polarity)?;
    let blink_led = StatusLed::new(pins.led_blink, config.led_polarity)?;

    let mut rig = Rig::new(config, side_a, side_b, runtime_led, blink_led, power_on)?;
    let mut sink = SerialEventSink::new(std::io::stdout());

    // ── 4. Session ────────────────────────────────────────────
    let watchdog = Watchdog::new(WATCHDOG_TIMEOUT_MS);
    let end = rig.run_session(&mut clock, &mut sink, || watchdog.feed());

    if sink.dropped() > 0 {
        error!("{} of {} records lost on the serial stream", sink.dropped(), sink.dropped() + sink.written());
    }
    info!("Session over at tick {}", end);

    // ── 5. Halt ───────────────────────────────────────────────
    watchdog.release();
    halt()
}
