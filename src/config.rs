//! Rig configuration parameters.
//!
//! Every tunable the rig uses.  Values are fixed at build time and handed
//! to the components as read-only parameters; nothing is reconfigured
//! while a session runs.  All durations are in ticks of [`Resolution`].

use serde::{Deserialize, Serialize};

use crate::clock::Resolution;
use crate::error::{Error, Result};
use crate::events::Side;
use embedded_hal::digital::PinState;

/// Electrical level that means "active" for a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    /// Logic-corrected value of a raw pin level.
    pub const fn is_active(self, pin_high: bool) -> bool {
        match self {
            Self::ActiveHigh => pin_high,
            Self::ActiveLow => !pin_high,
        }
    }

    /// Pin level that drives the output to `active`.
    pub const fn level(self, active: bool) -> PinState {
        if self.is_active(active) {
            PinState::High
        } else {
            PinState::Low
        }
    }
}

/// Core rig configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigConfig {
    // --- Time base ---
    /// Tick unit of every duration below.
    pub resolution: Resolution,

    // --- Trial ---
    /// Side whose touch sensor triggers a reward release.
    pub reward_side: Side,

    // --- Polarity ---
    pub ir_polarity: Polarity,
    pub touch_polarity: Polarity,
    pub solenoid_polarity: Polarity,
    pub led_polarity: Polarity,

    // --- Session ---
    /// Power-on to session start.
    pub start_delay: u32,
    /// Session start to session end.
    pub run_time: u32,

    // --- Detection / actuation ---
    /// Minimum hold of a raw beam transition before it is accepted.
    pub min_ir_break: u32,
    /// Reward valve open time.
    pub solenoid_pulse: u32,
    /// Blink LED half-period; `None` disables the blink LED.
    pub blink_interval: Option<u32>,
    /// Tolerance for the glitch-resistant clock read; `None` reads the
    /// clock directly.
    pub stable_read_tolerance: Option<u32>,

    // --- Console ---
    pub baud_rate: u32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::Millis,
            reward_side: Side::A,

            ir_polarity: Polarity::ActiveHigh,
            touch_polarity: Polarity::ActiveHigh,
            solenoid_polarity: Polarity::ActiveLow,
            led_polarity: Polarity::ActiveHigh,

            start_delay: 4 * 1000,      // 4 s
            run_time: 20 * 60 * 1000,   // 20 min

            min_ir_break: 5,
            solenoid_pulse: 80,
            blink_interval: Some(500),
            stable_read_tolerance: None,

            baud_rate: 115_200,
        }
    }
}

impl RigConfig {
    /// The default physical timings expressed in microsecond ticks.
    ///
    /// The counter wraps after ~71 minutes at this resolution; every
    /// duration here stays well below that.
    pub fn micros() -> Self {
        let ms = Self::default();
        let res = Resolution::Micros;
        Self {
            resolution: res,
            start_delay: res.ticks_from_millis(ms.start_delay),
            run_time: res.ticks_from_millis(ms.run_time),
            min_ir_break: res.ticks_from_millis(ms.min_ir_break),
            solenoid_pulse: res.ticks_from_millis(ms.solenoid_pulse),
            blink_interval: ms.blink_interval.map(|i| res.ticks_from_millis(i)),
            stable_read_tolerance: ms.stable_read_tolerance.map(|t| res.ticks_from_millis(t)),
            ..ms
        }
    }

    /// Reject parameter sets the timing engine cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.run_time == 0 {
            return Err(Error::Config("run_time must be non-zero"));
        }
        if self.min_ir_break == 0 {
            return Err(Error::Config("min_ir_break must be non-zero"));
        }
        if self.solenoid_pulse == 0 {
            return Err(Error::Config("solenoid_pulse must be non-zero"));
        }
        if self.solenoid_pulse >= self.run_time {
            return Err(Error::Config("solenoid_pulse must be shorter than run_time"));
        }
        if self.blink_interval == Some(0) {
            return Err(Error::Config("blink_interval must be non-zero"));
        }
        if self.stable_read_tolerance == Some(0) {
            return Err(Error::Config("stable_read_tolerance must be non-zero"));
        }
        Ok(())
    }

    /// JSON rendering for the boot banner.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|_| Error::Config("config not serialisable"))
    }
}
