//! Mock hardware for integration tests.
//!
//! Pins share their state through `Rc`, so the test keeps a handle to
//! drive inputs and inspect outputs while the rig owns the other.  Output
//! pins record every level written so tests can assert on the full
//! command history without touching real GPIO registers.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use rigfw::app::service::{Rig, Station};
use rigfw::clock::{Tick, TimeSource};
use rigfw::config::RigConfig;
use rigfw::drivers::status_led::StatusLed;
use rigfw::events::{LogEntry, Side};

// ── Pins ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MockInput(Rc<Cell<bool>>);

impl MockInput {
    pub fn set(&self, high: bool) {
        self.0.set(high);
    }
}

impl ErrorType for MockInput {
    type Error = Infallible;
}

impl InputPin for MockInput {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0.get())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockOutput {
    history: Rc<RefCell<Vec<bool>>>,
}

#[allow(dead_code)]
impl MockOutput {
    /// Level last written; low if never written.
    pub fn is_high(&self) -> bool {
        self.history.borrow().last().copied().unwrap_or(false)
    }

    pub fn writes(&self) -> usize {
        self.history.borrow().len()
    }

    pub fn history(&self) -> Vec<bool> {
        self.history.borrow().clone()
    }
}

impl ErrorType for MockOutput {
    type Error = Infallible;
}

impl OutputPin for MockOutput {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.history.borrow_mut().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.history.borrow_mut().push(true);
        Ok(())
    }
}

// ── Bench: one set of pins for a whole rig ────────────────────

pub type MockRig = Rig<MockInput, MockInput, MockOutput, MockOutput, MockOutput>;

#[derive(Default)]
pub struct MockBench {
    pub ir: [MockInput; 2],
    pub touch: [MockInput; 2],
    pub valve: [MockOutput; 2],
    pub led_runtime: MockOutput,
    pub led_blink: MockOutput,
}

impl MockBench {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a rig on this bench's pins.
    pub fn build(&self, config: RigConfig, power_on: Tick) -> MockRig {
        let station = |i: usize, side| {
            Station::from_pins(
                side,
                self.ir[i].clone(),
                self.touch[i].clone(),
                self.valve[i].clone(),
                &config,
                power_on,
            )
            .unwrap()
        };
        let a = station(0, Side::A);
        let b = station(1, Side::B);
        let runtime = StatusLed::new(self.led_runtime.clone(), config.led_polarity).unwrap();
        let blink = StatusLed::new(self.led_blink.clone(), config.led_polarity).unwrap();
        Rig::new(config, a, b, runtime, blink, power_on).unwrap()
    }
}

/// Short timings that keep scenarios readable.
pub fn bench_config() -> RigConfig {
    RigConfig {
        start_delay: 10,
        run_time: 1_000,
        min_ir_break: 2,
        solenoid_pulse: 5,
        blink_interval: Some(100),
        ..RigConfig::default()
    }
}

// ── Clock ─────────────────────────────────────────────────────

/// Replays scripted readings, then counts up by `step` from the last one.
pub struct ScriptedClock {
    script: VecDeque<u32>,
    current: u32,
    step: u32,
    pub reads: u32,
}

#[allow(dead_code)]
impl ScriptedClock {
    pub fn counting_from(start: u32, step: u32) -> Self {
        Self {
            script: VecDeque::new(),
            current: start.wrapping_sub(step),
            step,
            reads: 0,
        }
    }

    pub fn scripted(readings: &[u32], step: u32) -> Self {
        Self {
            script: readings.iter().copied().collect(),
            current: 0,
            step,
            reads: 0,
        }
    }
}

impl TimeSource for ScriptedClock {
    fn now(&mut self) -> Tick {
        self.reads += 1;
        self.current = match self.script.pop_front() {
            Some(reading) => reading,
            None => self.current.wrapping_add(self.step),
        };
        Tick(self.current)
    }
}

// ── Helpers ───────────────────────────────────────────────────

pub fn lines(sink: &[LogEntry]) -> Vec<String> {
    sink.iter().map(ToString::to_string).collect()
}

/// Tick the rig over `ticks`, setting inputs from `script` first.
pub fn run_ticks(
    rig: &mut MockRig,
    ticks: std::ops::Range<u32>,
    sink: &mut Vec<LogEntry>,
    mut script: impl FnMut(u32),
) {
    for t in ticks {
        script(t);
        rig.tick(Tick(t), sink).unwrap();
    }
}
