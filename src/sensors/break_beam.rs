//! Infrared break-beam detector with hold-time debouncing.
//!
//! ## Hardware
//!
//! IR emitter/receiver pair across the port opening.  The receiver output
//! is logic-corrected through the configured [`Polarity`] so that `true`
//! always means "beam interrupted".
//!
//! ## Debounce policy
//!
//! Mounted inside the circular port housing, the receiver alternates
//! rapidly between high and low from internal reflections.  A break is
//! therefore armed on the OR of the two stored samples plus a fresh
//! positive read, and cleared only when both stored samples and the fresh
//! read agree the beam is intact:
//!
//! | Transition | Arms when                                   | Confirmed after         |
//! |------------|---------------------------------------------|-------------------------|
//! | break      | `(current ∥ previous) && fresh && !in_break` | `min_hold` since rise   |
//! | clear      | `!(current ∥ previous) && !fresh && in_break`| `min_hold` since fall   |
//!
//! Hold times run from the raw edge that armed the candidate, not from the
//! tick it was recognised, so the window is exact to that edge.  The sample
//! taken at construction seeds the history but is not an edge: a candidate
//! with no sampled edge behind it is timed from the tick it arms.

use embedded_hal::digital::InputPin;
use log::debug;

use crate::app::ports::EventSink;
use crate::clock::Tick;
use crate::config::Polarity;
use crate::error::{Result, SensorError};
use crate::events::{EventClass, EventRecord, EventState, LogEntry, Side};

use super::read_active;

/// Debounced beam state reported by every [`BreakBeamDetector::update`].
///
/// The `Just*` variants are reported for exactly the one update in which
/// the transition is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeamStatus {
    /// Beam intact.
    Connected,
    /// Break confirmed on this update.
    JustBroken,
    /// Break confirmed earlier and still active.
    Broken,
    /// Break cleared on this update.
    JustRestored,
}

impl BeamStatus {
    pub fn is_broken(self) -> bool {
        matches!(self, Self::JustBroken | Self::Broken)
    }

    /// True only on the update that confirmed a transition.
    pub fn is_edge(self) -> bool {
        matches!(self, Self::JustBroken | Self::JustRestored)
    }
}

pub struct BreakBeamDetector<P> {
    pin: P,
    side: Side,
    polarity: Polarity,
    min_hold: u32,
    /// Latest stored raw sample.
    current_read: bool,
    /// Sample before `current_read`.
    last_read: bool,
    /// A break candidate is armed (transient, not yet confirmed).
    in_break: bool,
    /// Confirmed break.  `!broken` is the "connected" state.
    broken: bool,
    /// Tick of the raw rising edge that armed the current break candidate.
    t_start: Tick,
    /// Tick of the raw falling edge that armed the current clear candidate.
    t_off: Tick,
    /// Latest sampled raw rising edge; `None` until one is seen.
    last_rise: Option<Tick>,
    /// Latest sampled raw falling edge; `None` until one is seen.
    last_fall: Option<Tick>,
}

impl<P: InputPin> BreakBeamDetector<P> {
    /// Take the pin and sample it once to seed the sample history.
    pub fn new(mut pin: P, side: Side, polarity: Polarity, min_hold: u32, now: Tick) -> Result<Self> {
        let initial = read_active(&mut pin, polarity, SensorError::BeamReadFailed)?;
        Ok(Self {
            pin,
            side,
            polarity,
            min_hold,
            current_read: initial,
            last_read: false,
            in_break: false,
            broken: false,
            t_start: now,
            t_off: now,
            last_rise: None,
            last_fall: None,
        })
    }

    /// Sample the beam and advance the debounce state machine.
    ///
    /// Logs `IR ON` when a break is confirmed and `IR OFF` when it clears,
    /// timestamped relative to `session_start`.
    pub fn update(&mut self, now: Tick, session_start: Tick, sink: &mut dyn EventSink) -> Result<BeamStatus> {
        let fresh = read_active(&mut self.pin, self.polarity, SensorError::BeamReadFailed)?;

        if fresh && !self.current_read {
            self.last_rise = Some(now);
        } else if !fresh && self.current_read {
            self.last_fall = Some(now);
        }

        let recent = self.current_read || self.last_read;
        if recent && fresh && !self.in_break {
            self.t_start = self.last_rise.unwrap_or(now);
            self.in_break = true;
            debug!("IR {:?}: break armed at {}", self.side, self.t_start);
        } else if !recent && !fresh && self.in_break {
            self.t_off = self.last_fall.unwrap_or(now);
            self.in_break = false;
            debug!("IR {:?}: clear armed at {}", self.side, self.t_off);
        }

        let mut status = self.status();
        if !self.in_break && self.broken && now.ticks_since(self.t_off) >= self.min_hold {
            self.broken = false;
            self.log(EventState::Off, now, session_start, sink);
            status = BeamStatus::JustRestored;
        }
        if self.in_break && !self.broken && now.ticks_since(self.t_start) >= self.min_hold {
            self.broken = true;
            self.log(EventState::On, now, session_start, sink);
            status = BeamStatus::JustBroken;
        }

        self.last_read = self.current_read;
        self.current_read = fresh;
        Ok(status)
    }

    /// Sample the beam without arming, confirming or logging anything.
    ///
    /// Keeps the two-sample history current before the first
    /// [`update`](Self::update), so a reading taken long before the session
    /// cannot stand in for one of the two samples the arm rule looks at.
    pub fn track(&mut self) -> Result<()> {
        let fresh = read_active(&mut self.pin, self.polarity, SensorError::BeamReadFailed)?;
        self.last_read = self.current_read;
        self.current_read = fresh;
        Ok(())
    }

    fn log(&self, state: EventState, now: Tick, session_start: Tick, sink: &mut dyn EventSink) {
        sink.emit(&LogEntry::Event(EventRecord::at(
            self.side,
            EventClass::Ir,
            state,
            now,
            session_start,
        )));
    }
}

impl<P> BreakBeamDetector<P> {
    /// Steady-state view: never reports a `Just*` edge.
    pub fn status(&self) -> BeamStatus {
        if self.broken {
            BeamStatus::Broken
        } else {
            BeamStatus::Connected
        }
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// A break candidate is armed or confirmed and not yet cleared.
    pub fn in_break(&self) -> bool {
        self.in_break
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Raw edge that armed the latest break candidate.
    pub fn break_started_at(&self) -> Tick {
        self.t_start
    }

    /// Raw edge that armed the latest clear candidate.
    pub fn break_cleared_at(&self) -> Tick {
        self.t_off
    }
}
