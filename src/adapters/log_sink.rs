//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by mirroring every record to the `log` facade
//! (the ESP-IDF logger on target).  Useful when the console carries both
//! diagnostics and records and a human is watching rather than a capture
//! script.  Pair it with [`SerialEventSink`](super::serial_sink::SerialEventSink)
//! through [`Tee`] to get both.

use log::info;

use crate::app::ports::EventSink;
use crate::events::{EventState, LogEntry};

/// Adapter that logs every [`LogEntry`] to the console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, entry: &LogEntry) {
        match entry {
            LogEntry::Event(rec) => {
                let state = match rec.state {
                    EventState::On => "ON",
                    EventState::Off => "OFF",
                };
                info!(
                    "EVENT | side={:?} {:?} {} | +{} | {}",
                    rec.side, rec.class, state, rec.elapsed, rec
                );
            }
            LogEntry::SessionStart(tick) => {
                info!("SESSION | start at {}", tick);
            }
            LogEntry::SessionEnd(tick) => {
                info!("SESSION | end at {}", tick);
            }
        }
    }
}

/// Fans every record out to two sinks, `first` then `second`.
pub struct Tee<A, B> {
    pub first: A,
    pub second: B,
}

impl<A: EventSink, B: EventSink> EventSink for Tee<A, B> {
    fn emit(&mut self, entry: &LogEntry) {
        self.first.emit(entry);
        self.second.emit(entry);
    }
}
