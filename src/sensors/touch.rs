//! Touch (lick) sensor edge detector.
//!
//! The capacitive touch module has shown no chatter on the rig, so there
//! is no debounce window: a raw rising edge is a touch onset and a raw
//! falling edge is a release, both reported on the tick they are seen.

use embedded_hal::digital::InputPin;

use crate::app::ports::EventSink;
use crate::clock::Tick;
use crate::config::Polarity;
use crate::error::{Result, SensorError};
use crate::events::{EventClass, EventRecord, EventState, LogEntry, Side};

use super::read_active;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEdge {
    Touched,
    Released,
}

pub struct TouchDetector<P> {
    pin: P,
    side: Side,
    polarity: Polarity,
    last: bool,
    /// Touch onset seen and not yet released.  Its negation is the
    /// "clear" state.
    in_touch: bool,
    t_start: Tick,
    t_off: Tick,
}

impl<P: InputPin> TouchDetector<P> {
    /// The sensor is assumed released until the first update, so a touch
    /// already present at boot is reported on that update.
    pub fn new(pin: P, side: Side, polarity: Polarity) -> Self {
        Self {
            pin,
            side,
            polarity,
            last: false,
            in_touch: false,
            t_start: Tick::ZERO,
            t_off: Tick::ZERO,
        }
    }

    /// Sample the sensor; logs `Touch ON`/`Touch OFF` on an edge.
    pub fn update(&mut self, now: Tick, session_start: Tick, sink: &mut dyn EventSink) -> Result<Option<TouchEdge>> {
        let v = read_active(&mut self.pin, self.polarity, SensorError::TouchReadFailed)?;

        let edge = match (v, self.last) {
            (true, false) => {
                self.t_start = now;
                self.in_touch = true;
                Some(TouchEdge::Touched)
            }
            (false, true) => {
                self.t_off = now;
                self.in_touch = false;
                Some(TouchEdge::Released)
            }
            _ => None,
        };

        if let Some(edge) = edge {
            let state = match edge {
                TouchEdge::Touched => EventState::On,
                TouchEdge::Released => EventState::Off,
            };
            sink.emit(&LogEntry::Event(EventRecord::at(
                self.side,
                EventClass::Touch,
                state,
                now,
                session_start,
            )));
        }

        self.last = v;
        Ok(edge)
    }
}

impl<P> TouchDetector<P> {
    pub fn is_touching(&self) -> bool {
        self.in_touch
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn touched_at(&self) -> Tick {
        self.t_start
    }

    pub fn released_at(&self) -> Tick {
        self.t_off
    }
}
