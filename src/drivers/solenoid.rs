//! Solenoid reward valve driver.
//!
//! One timed pulse per accepted activation.  While the valve is open every
//! further activation request is dropped, so a burst of triggers can never
//! extend or restart a release.
//!
//! ## Safety contract
//!
//! The valve is driven closed when the driver is built, and the session
//! supervisor forces it closed at session end through [`FailSafe`],
//! whatever its own timer says.

use embedded_hal::digital::OutputPin;
use log::debug;

use crate::app::ports::{EventSink, FailSafe};
use crate::clock::Tick;
use crate::config::Polarity;
use crate::error::{ActuatorError, Result};
use crate::events::{EventClass, EventRecord, EventState, LogEntry, Side};

pub struct SolenoidActuator<P> {
    pin: P,
    side: Side,
    polarity: Polarity,
    open: bool,
    /// Start of the latest accepted pulse.
    t_open: Tick,
    /// End of the latest pulse, forced or timed.
    t_close: Tick,
    /// Length of the latest accepted pulse.
    duration: u32,
}

impl<P: OutputPin> SolenoidActuator<P> {
    pub fn new(pin: P, side: Side, polarity: Polarity) -> Result<Self> {
        let mut valve = Self {
            pin,
            side,
            polarity,
            open: false,
            t_open: Tick::ZERO,
            t_close: Tick::ZERO,
            duration: 0,
        };
        valve.drive(false)?;
        Ok(valve)
    }

    /// Open the valve for `duration` ticks.  Returns `false` (and changes
    /// nothing) if the valve is already open.
    pub fn activate(&mut self, duration: u32, now: Tick, session_start: Tick, sink: &mut dyn EventSink) -> Result<bool> {
        if self.is_open() {
            debug!("Solenoid {:?}: busy, activation at {} dropped", self.side, now);
            return Ok(false);
        }
        self.drive(true)?;
        self.open = true;
        self.t_open = now;
        self.duration = duration;
        self.log(EventState::On, now, session_start, sink);
        Ok(true)
    }

    /// Close the valve once its pulse has elapsed.  Returns `true` on the
    /// tick it closes.
    pub fn update(&mut self, now: Tick, session_start: Tick, sink: &mut dyn EventSink) -> Result<bool> {
        if self.open && now.ticks_since(self.t_open) >= self.duration {
            self.close(now, session_start, sink)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn close(&mut self, now: Tick, session_start: Tick, sink: &mut dyn EventSink) -> Result<()> {
        self.drive(false)?;
        self.open = false;
        self.t_close = now;
        self.log(EventState::Off, now, session_start, sink);
        Ok(())
    }

    fn drive(&mut self, open: bool) -> Result<()> {
        self.pin
            .set_state(self.polarity.level(open))
            .map_err(|_| ActuatorError::ValveWriteFailed.into())
    }

    fn log(&self, state: EventState, now: Tick, session_start: Tick, sink: &mut dyn EventSink) {
        sink.emit(&LogEntry::Event(EventRecord::at(
            self.side,
            EventClass::Solenoid,
            state,
            now,
            session_start,
        )));
    }
}

impl<P> SolenoidActuator<P> {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn opened_at(&self) -> Tick {
        self.t_open
    }

    pub fn closed_at(&self) -> Tick {
        self.t_close
    }

    /// Duration of the latest accepted pulse.
    pub fn pulse_duration(&self) -> u32 {
        self.duration
    }
}

impl<P: OutputPin> FailSafe for SolenoidActuator<P> {
    /// Closes the valve.  The `Solenoid OFF` record is only written if the
    /// valve was open; the closed level is driven either way.
    fn force_safe(&mut self, now: Tick, session_start: Tick, sink: &mut dyn EventSink) -> Result<()> {
        if self.is_open() {
            self.close(now, session_start, sink)
        } else {
            self.drive(false)
        }
    }
}
