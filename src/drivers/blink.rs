//! Free-running blink indicator.
//!
//! Toggles its LED every `interval` ticks on its own timing base, with no
//! coupling to session or sensor state.

use embedded_hal::digital::OutputPin;

use crate::clock::Tick;
use crate::error::Result;

use super::status_led::StatusLed;

pub struct BlinkIndicator<P> {
    led: StatusLed<P>,
    interval: u32,
    /// Tick the LED last turned on.
    t_on: Tick,
    /// Tick the LED last turned off.
    t_off: Tick,
}

impl<P: OutputPin> BlinkIndicator<P> {
    /// Starts dark; `now` anchors the first interval.
    pub fn new(led: StatusLed<P>, interval: u32, now: Tick) -> Self {
        Self {
            led,
            interval,
            t_on: now,
            t_off: now,
        }
    }

    /// Flip the LED once `interval` has elapsed since the last edge.
    /// Returns `true` on the tick it flips.
    pub fn update(&mut self, now: Tick) -> Result<bool> {
        if now.ticks_since(self.last_edge()) < self.interval {
            return Ok(false);
        }
        self.led.toggle()?;
        if self.led.is_lit() {
            self.t_on = now;
        } else {
            self.t_off = now;
        }
        Ok(true)
    }
}

impl<P> BlinkIndicator<P> {
    pub fn is_lit(&self) -> bool {
        self.led.is_lit()
    }

    pub fn last_edge(&self) -> Tick {
        if self.led.is_lit() { self.t_on } else { self.t_off }
    }
}
