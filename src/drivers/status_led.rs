//! Single-colour indicator LED driver.
//!
//! Used for the session-runtime LED and the blink LED.  Polarity is
//! resolved here so callers only say on/off.

use embedded_hal::digital::OutputPin;

use crate::config::Polarity;
use crate::error::{ActuatorError, Result};

pub struct StatusLed<P> {
    pin: P,
    polarity: Polarity,
    lit: bool,
}

impl<P: OutputPin> StatusLed<P> {
    /// Take the pin and drive it dark.
    pub fn new(pin: P, polarity: Polarity) -> Result<Self> {
        let mut led = Self { pin, polarity, lit: false };
        led.set(false)?;
        Ok(led)
    }

    pub fn set(&mut self, lit: bool) -> Result<()> {
        self.pin
            .set_state(self.polarity.level(lit))
            .map_err(|_| ActuatorError::LedWriteFailed)?;
        self.lit = lit;
        Ok(())
    }

    pub fn on(&mut self) -> Result<()> {
        self.set(true)
    }

    pub fn off(&mut self) -> Result<()> {
        self.set(false)
    }

    pub fn toggle(&mut self) -> Result<()> {
        self.set(!self.lit)
    }
}

impl<P> StatusLed<P> {
    pub fn is_lit(&self) -> bool {
        self.lit
    }
}
