//! Session runtime supervisor.
//!
//! Owns the session lifecycle and the runtime LED:
//!
//! ```text
//!  IDLE ──[start_delay since power-on]──▶ RUNNING ──[run_time since start]──▶ TERMINATED
//!  LED off                                 LED on, "S<tick>"                  valves forced closed,
//!                                                                             LED off, "E<tick>"
//! ```
//!
//! `Terminated` is absorbing: every later update returns immediately with
//! no pin writes and no log output.  The apparatus runs one session per
//! power cycle; after termination the tick loop stops and calls [`halt`].

use core::time::Duration;

use embedded_hal::digital::OutputPin;
use log::{error, info};

use crate::app::ports::{EventSink, FailSafe};
use crate::clock::Tick;
use crate::drivers::status_led::StatusLed;
use crate::error::Result;
use crate::events::LogEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting out the start delay.
    Idle,
    /// Session active since `since`.
    Running { since: Tick },
    /// Session over; nothing further happens.
    Terminated,
}

pub struct RuntimeSupervisor<P> {
    led: StatusLed<P>,
    phase: SessionPhase,
    /// Power-on anchor for the start delay.
    t_start: Tick,
    t_runtime_start: Tick,
    t_last: Tick,
    delay: u32,
    duration: u32,
}

impl<P: OutputPin> RuntimeSupervisor<P> {
    pub fn new(led: StatusLed<P>, delay: u32, duration: u32, power_on: Tick) -> Self {
        Self {
            led,
            phase: SessionPhase::Idle,
            t_start: power_on,
            t_runtime_start: power_on,
            t_last: power_on,
            delay,
            duration,
        }
    }

    /// Advance the lifecycle to `now`.
    ///
    /// On the terminating tick every valve in `valves` is forced to its
    /// safe state.  A failure there does not stop the shutdown: the other
    /// valves are still closed, the LED still turned off, the phase still
    /// becomes `Terminated`, and the first error is returned afterwards.
    pub fn update(&mut self, now: Tick, valves: &mut [&mut dyn FailSafe], sink: &mut dyn EventSink) -> Result<SessionPhase> {
        if self.phase == SessionPhase::Terminated {
            return Ok(self.phase);
        }
        self.t_last = now;

        if self.phase == SessionPhase::Idle && now.ticks_since(self.t_start) >= self.delay {
            self.begin(now, sink)?;
        }
        if let SessionPhase::Running { since } = self.phase {
            if now.ticks_since(since) >= self.duration {
                self.terminate(now, since, valves, sink)?;
            }
        }
        Ok(self.phase)
    }

    fn begin(&mut self, now: Tick, sink: &mut dyn EventSink) -> Result<()> {
        self.phase = SessionPhase::Running { since: now };
        self.t_runtime_start = now;
        sink.emit(&LogEntry::SessionStart(now));
        info!(
            "Session started at {} ({} ticks after power-on), runs {} ticks",
            now,
            now.ticks_since(self.t_start),
            self.duration
        );
        self.led.on()
    }

    fn terminate(&mut self, now: Tick, since: Tick, valves: &mut [&mut dyn FailSafe], sink: &mut dyn EventSink) -> Result<()> {
        self.phase = SessionPhase::Terminated;
        let mut first_err = None;

        for valve in valves.iter_mut() {
            if let Err(e) = valve.force_safe(now, since, sink) {
                error!("Session end: valve shutdown failed: {e}");
                first_err.get_or_insert(e);
            }
        }
        if let Err(e) = self.led.off() {
            error!("Session end: runtime LED off failed: {e}");
            first_err.get_or_insert(e);
        }

        sink.emit(&LogEntry::SessionEnd(now));
        info!("Session ended at {} after {} ticks", now, now.ticks_since(since));

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<P> RuntimeSupervisor<P> {
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, SessionPhase::Running { .. })
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == SessionPhase::Terminated
    }

    /// Session-start anchor for event timestamps, once the session began.
    pub fn session_start(&self) -> Option<Tick> {
        match self.phase {
            SessionPhase::Idle => None,
            _ => Some(self.t_runtime_start),
        }
    }

    /// Latest tick processed before termination.
    pub fn last_tick(&self) -> Tick {
        self.t_last
    }
}

/// Terminal halt.  Parks the calling task forever; nothing observable
/// happens after the session ends.
pub fn halt() -> ! {
    info!("Halted. Power-cycle to run another session.");
    loop {
        std::thread::sleep(Duration::from_secs(3600));
    }
}
