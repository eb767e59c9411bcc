//! Application service: the tick-driven core of the rig.
//!
//! [`Rig`] owns both sides of the apparatus, the session supervisor and
//! the blink indicator.  Hardware enters as `embedded-hal` pins owned by
//! each component; records leave through the [`EventSink`] port.  The
//! whole service runs against simulated pins on the host.
//!
//! ```text
//!  TimeSource ──▶ ┌─────────────────────────────────┐ ──▶ EventSink
//!                 │               Rig                │
//!   InputPins ──▶ │  Supervisor · Station A · B      │ ──▶ OutputPins
//!                 │  Blink                           │
//!                 └─────────────────────────────────┘
//! ```
//!
//! One tick, in order:
//!
//! 1. supervisor (may start or end the session),
//! 2. while idle, both beams are sampled silently to keep their history
//!    current; once running, side A then side B: beam, touch, reward
//!    policy, valve,
//! 3. blink, unless the session has terminated.

use embedded_hal::digital::{InputPin, OutputPin};
use log::{debug, info, warn};

use crate::clock::{Tick, TimeSource};
use crate::config::RigConfig;
use crate::drivers::blink::BlinkIndicator;
use crate::drivers::solenoid::SolenoidActuator;
use crate::drivers::status_led::StatusLed;
use crate::error::{Error, Result};
use crate::events::Side;
use crate::sensors::break_beam::{BeamStatus, BreakBeamDetector};
use crate::sensors::touch::{TouchDetector, TouchEdge};
use crate::session::{RuntimeSupervisor, SessionPhase};

use super::ports::{EventSink, FailSafe};

// ───────────────────────────────────────────────────────────────
// Station
// ───────────────────────────────────────────────────────────────

/// One side of the apparatus: break-beam, touch sensor and reward valve.
pub struct Station<IR, T, S> {
    pub beam: BreakBeamDetector<IR>,
    pub touch: TouchDetector<T>,
    pub valve: SolenoidActuator<S>,
}

/// What one station saw and did on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationReport {
    pub beam: BeamStatus,
    pub touch: Option<TouchEdge>,
    /// A reward pulse started this tick.
    pub rewarded: bool,
    /// The valve closed this tick.
    pub valve_closed: bool,
}

impl<IR: InputPin, T: InputPin, S: OutputPin> Station<IR, T, S> {
    pub fn new(beam: BreakBeamDetector<IR>, touch: TouchDetector<T>, valve: SolenoidActuator<S>) -> Result<Self> {
        if beam.side() != touch.side() || touch.side() != valve.side() {
            return Err(Error::Init("station components disagree on side"));
        }
        Ok(Self { beam, touch, valve })
    }

    /// Build a station from raw pins with the timings in `config`.
    /// The valve is driven closed and the beam sampled once at `now`.
    pub fn from_pins(side: Side, ir: IR, touch: T, valve: S, config: &RigConfig, now: Tick) -> Result<Self> {
        let beam = BreakBeamDetector::new(ir, side, config.ir_polarity, config.min_ir_break, now)?;
        let touch = TouchDetector::new(touch, side, config.touch_polarity);
        let valve = SolenoidActuator::new(valve, side, config.solenoid_polarity)?;
        Ok(Self { beam, touch, valve })
    }

    pub fn side(&self) -> Side {
        self.valve.side()
    }

    /// Run one tick for this side.  `reward_pulse` is `Some` on the
    /// rewarded side only.
    ///
    /// A failed read does not skip the rest of the side: the other sensor
    /// is still polled and the valve timer still serviced, so a faulty
    /// input can never hold the valve open past its pulse.  The first
    /// error, in beam, touch, reward, valve order, is returned.
    pub fn step(
        &mut self,
        now: Tick,
        session_start: Tick,
        reward_pulse: Option<u32>,
        sink: &mut dyn EventSink,
    ) -> Result<StationReport> {
        let beam = self.beam.update(now, session_start, sink);
        let touch = self.touch.update(now, session_start, sink);
        let rewarded = match (reward_pulse, &touch) {
            (Some(pulse), Ok(Some(TouchEdge::Touched))) => self.reward(pulse, now, session_start, sink),
            _ => Ok(false),
        };
        let closed = self.valve.update(now, session_start, sink);

        Ok(StationReport {
            beam: beam?,
            touch: touch?,
            rewarded: rewarded?,
            valve_closed: closed?,
        })
    }

    fn reward(&mut self, pulse: u32, now: Tick, session_start: Tick, sink: &mut dyn EventSink) -> Result<bool> {
        let rewarded = self.valve.activate(pulse, now, session_start, sink)?;
        if rewarded {
            debug!("Side {:?}: reward released at {}", self.side(), now);
        }
        Ok(rewarded)
    }
}

// ───────────────────────────────────────────────────────────────
// Rig
// ───────────────────────────────────────────────────────────────

/// The whole apparatus.
pub struct Rig<IR, T, S, L, B> {
    config: RigConfig,
    supervisor: RuntimeSupervisor<L>,
    side_a: Station<IR, T, S>,
    side_b: Station<IR, T, S>,
    blink: Option<BlinkIndicator<B>>,
    /// Latest tick handed to [`Rig::tick`].
    last: Tick,
    rewards: u32,
}

impl<IR, T, S, L, B> Rig<IR, T, S, L, B>
where
    IR: InputPin,
    T: InputPin,
    S: OutputPin,
    L: OutputPin,
    B: OutputPin,
{
    /// Assemble the rig.  `power_on` anchors the start delay and the first
    /// blink interval.
    ///
    /// The blink LED is left dark and never driven when the config
    /// disables it.
    pub fn new(
        config: RigConfig,
        side_a: Station<IR, T, S>,
        side_b: Station<IR, T, S>,
        runtime_led: StatusLed<L>,
        blink_led: StatusLed<B>,
        power_on: Tick,
    ) -> Result<Self> {
        config.validate()?;
        if side_a.side() != Side::A || side_b.side() != Side::B {
            return Err(Error::Init("stations must be passed as side A, side B"));
        }

        let supervisor = RuntimeSupervisor::new(runtime_led, config.start_delay, config.run_time, power_on);
        let blink = config
            .blink_interval
            .map(|interval| BlinkIndicator::new(blink_led, interval, power_on));

        info!(
            "Rig ready: reward side {:?}, start in {} ticks, session {} ticks, pulse {}",
            config.reward_side, config.start_delay, config.run_time, config.solenoid_pulse
        );

        Ok(Self {
            config,
            supervisor,
            side_a,
            side_b,
            blink,
            last: power_on,
            rewards: 0,
        })
    }

    /// Read the clock the way the config asks: the glitch-resistant read
    /// when a tolerance is set, the raw counter otherwise.
    pub fn read_clock(&self, clock: &mut impl TimeSource) -> Tick {
        match self.config.stable_read_tolerance {
            Some(tolerance) => clock.now_stable(self.last, tolerance),
            None => clock.now(),
        }
    }

    /// Run one control cycle at `now`.
    ///
    /// A component error does not skip the rest of the tick: every
    /// component still runs and the first error is returned.
    pub fn tick(&mut self, now: Tick, sink: &mut dyn EventSink) -> Result<SessionPhase> {
        self.last = now;
        let mut first_err: Option<Error> = None;

        let phase = {
            let mut valves: [&mut dyn FailSafe; 2] = [&mut self.side_a.valve, &mut self.side_b.valve];
            match self.supervisor.update(now, &mut valves, sink) {
                Ok(phase) => phase,
                Err(e) => {
                    first_err = Some(e);
                    self.supervisor.phase()
                }
            }
        };

        if phase == SessionPhase::Idle {
            for station in [&mut self.side_a, &mut self.side_b] {
                if let Err(e) = station.beam.track() {
                    first_err.get_or_insert(e);
                }
            }
        }

        if let SessionPhase::Running { since } = phase {
            let reward_side = self.config.reward_side;
            let pulse = self.config.solenoid_pulse;

            for station in [&mut self.side_a, &mut self.side_b] {
                let reward = (station.side() == reward_side).then_some(pulse);
                match station.step(now, since, reward, sink) {
                    Ok(report) if report.rewarded => self.rewards += 1,
                    Ok(_) => {}
                    Err(e) => {
                        first_err.get_or_insert(e);
                    }
                }
            }
        }

        if phase != SessionPhase::Terminated {
            if let Some(blink) = self.blink.as_mut() {
                if let Err(e) = blink.update(now) {
                    first_err.get_or_insert(e);
                }
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(phase),
        }
    }

    /// Drive the tick loop until the session terminates.  `each_tick`
    /// runs after every tick (the target feeds its watchdog there).
    /// Returns the terminating tick.
    pub fn run_session(
        &mut self,
        clock: &mut impl TimeSource,
        sink: &mut dyn EventSink,
        mut each_tick: impl FnMut(),
    ) -> Tick {
        loop {
            let now = self.read_clock(clock);
            match self.tick(now, sink) {
                Ok(SessionPhase::Terminated) => {
                    info!("Session complete at {}: {} rewards released", now, self.rewards);
                    return now;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Tick {} error: {}", now, e);
                    if self.supervisor.is_terminated() {
                        return now;
                    }
                }
            }
            each_tick();
        }
    }
}

impl<IR, T, S, L, B> Rig<IR, T, S, L, B> {
    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.supervisor.phase()
    }

    pub fn is_terminated(&self) -> bool {
        self.supervisor.is_terminated()
    }

    pub fn station(&self, side: Side) -> &Station<IR, T, S> {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    pub fn blink(&self) -> Option<&BlinkIndicator<B>> {
        self.blink.as_ref()
    }

    pub fn last_tick(&self) -> Tick {
        self.last
    }

    /// Reward pulses released so far.
    pub fn rewards(&self) -> u32 {
        self.rewards
    }
}
