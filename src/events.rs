//! Event log records.
//!
//! Every detector and actuator reports state changes as an [`EventRecord`]:
//! side, event class, state, and ticks elapsed since session start.  The
//! serial wire form is the four numeric identifiers concatenated on one
//! line, which is what the offline analysis scripts parse:
//!
//! ```text
//! 0 1 1 1532   ->  "0111532"   side A, touch, ON, 1532 ticks into session
//! S 40012      ->  "S40012"    session started at absolute tick 40012
//! E 1240012    ->  "E1240012"  session ended at absolute tick 1240012
//! ```
//!
//! Records start with a digit and session markers with a letter, so a
//! reader can tell them apart from the first character.

use core::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

use crate::clock::Tick;

/// Longest rendered line: `"E"` + ten digits, or three ids + ten digits.
pub const LINE_CAP: usize = 16;

/// Apparatus side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    A = 0,
    B = 1,
}

impl Side {
    pub const fn id(self) -> u8 {
        self as u8
    }
}

/// Which kind of component produced the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EventClass {
    Ir = 0,
    Touch = 1,
    Solenoid = 2,
}

impl EventClass {
    pub const fn id(self) -> u8 {
        self as u8
    }
}

/// ON = beam broken / touch onset / valve opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EventState {
    Off = 0,
    On = 1,
}

impl EventState {
    pub const fn id(self) -> u8 {
        self as u8
    }
}

/// One timestamped sensor or actuator event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRecord {
    pub side: Side,
    pub class: EventClass,
    pub state: EventState,
    /// Ticks since the session-start anchor.
    pub elapsed: u32,
}

impl EventRecord {
    /// Build a record for an event observed at `now` in a session that
    /// started at `session_start`.
    pub const fn at(
        side: Side,
        class: EventClass,
        state: EventState,
        now: Tick,
        session_start: Tick,
    ) -> Self {
        Self {
            side,
            class,
            state,
            elapsed: now.ticks_since(session_start),
        }
    }
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            self.side.id(),
            self.class.id(),
            self.state.id(),
            self.elapsed
        )
    }
}

/// Everything that goes into the event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogEntry {
    Event(EventRecord),
    /// Session became active at this absolute tick.
    SessionStart(Tick),
    /// Session terminated at this absolute tick.
    SessionEnd(Tick),
}

impl LogEntry {
    /// Render the wire line (without terminator) into a fixed buffer.
    pub fn to_line(&self) -> heapless::String<LINE_CAP> {
        let mut line = heapless::String::new();
        // LINE_CAP covers the longest possible entry.
        let _ = write!(line, "{self}");
        line
    }

    pub fn as_event(&self) -> Option<&EventRecord> {
        match self {
            Self::Event(record) => Some(record),
            _ => None,
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event(record) => fmt::Display::fmt(record, f),
            Self::SessionStart(t) => write!(f, "S{t}"),
            Self::SessionEnd(t) => write!(f, "E{t}"),
        }
    }
}
