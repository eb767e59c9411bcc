//! Serial record stream adapter.
//!
//! Writes one record per line, `\n`-terminated, to any [`std::io::Write`]:
//! stdout (the console UART under ESP-IDF) on target, a `Vec<u8>` in
//! tests.  This is the stream the capture script on the host parses, so
//! nothing but records goes through it.
//!
//! A failed write is not fatal to the session.  The line is dropped, a
//! warning is logged, and the drop is counted.

use std::io::Write;

use log::warn;

use crate::app::ports::EventSink;
use crate::events::LogEntry;

pub struct SerialEventSink<W> {
    out: W,
    written: u32,
    dropped: u32,
}

impl<W: Write> SerialEventSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            written: 0,
            dropped: 0,
        }
    }

    fn write_line(&mut self, entry: &LogEntry) -> std::io::Result<()> {
        let line = entry.to_line();
        self.out.write_all(line.as_bytes())?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }

    /// Lines written successfully.
    pub fn written(&self) -> u32 {
        self.written
    }

    /// Lines lost to write errors.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EventSink for SerialEventSink<W> {
    fn emit(&mut self, entry: &LogEntry) {
        match self.write_line(entry) {
            Ok(()) => self.written += 1,
            Err(e) => {
                self.dropped += 1;
                warn!("Record '{}' dropped: {} ({} lost so far)", entry, e, self.dropped);
            }
        }
    }
}
