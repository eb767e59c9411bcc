//! Tick time base shared by every detector, actuator, and the supervisor.
//!
//! A [`Tick`] is a 32-bit monotonic counter that wraps, exactly like the
//! hardware counter behind it: in milliseconds it wraps after ~49.7 days,
//! in microseconds after ~71.6 minutes.  Durations are always computed
//! with [`Tick::ticks_since`], which subtracts in modular arithmetic so a
//! wrap between the two readings self-corrects.
//!
//! The glitch-resistant read ([`TimeSource::now_stable`]) blocks until the
//! clock produces a reading that is not behind the previous one and not
//! implausibly far ahead.  A permanently glitching clock blocks forever:
//! no sensor decision is trustworthy without a valid time base, so halting
//! is the fail-safe outcome.

use core::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimeError};

/// Reads per bounded round inside [`TimeSource::now_stable`].
const STABLE_READ_ROUND: u32 = 10_000;

/// One reading of the monotonic counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Tick(pub u32);

impl Tick {
    pub const ZERO: Self = Self(0);

    /// Raw counter value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Ticks elapsed from `earlier` to `self`, correct across one wrap.
    pub const fn ticks_since(self, earlier: Tick) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// `self` advanced by `ticks`, wrapping.
    pub const fn wrapping_add(self, ticks: u32) -> Tick {
        Tick(self.0.wrapping_add(ticks))
    }

    /// True if `self` is a trustworthy successor of `last`: not behind it
    /// (modulo wrap) and at most `tolerance` ticks ahead.
    ///
    /// A backwards step shows up as a huge modular delta, so a single
    /// comparison covers both conditions.
    pub const fn is_plausible_after(self, last: Tick, tolerance: u32) -> bool {
        self.ticks_since(last) <= tolerance
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unit of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Millis,
    Micros,
}

impl Resolution {
    /// Convert a millisecond duration into ticks of this resolution.
    pub const fn ticks_from_millis(self, ms: u32) -> u32 {
        match self {
            Self::Millis => ms,
            Self::Micros => ms.saturating_mul(1_000),
        }
    }

    /// Counter period before wraparound, in seconds.
    pub const fn wrap_period_secs(self) -> u64 {
        match self {
            Self::Millis => (u32::MAX as u64 + 1) / 1_000,
            Self::Micros => (u32::MAX as u64 + 1) / 1_000_000,
        }
    }
}

/// Monotonic tick provider.
pub trait TimeSource {
    /// Current counter reading.
    fn now(&mut self) -> Tick;

    /// Re-read up to `attempts` times until a reading is plausible after
    /// `last` (see [`Tick::is_plausible_after`]).
    fn read_stable(&mut self, last: Tick, tolerance: u32, attempts: u32) -> Result<Tick> {
        for _ in 0..attempts {
            let reading = self.now();
            if reading.is_plausible_after(last, tolerance) {
                return Ok(reading);
            }
        }
        Err(TimeError::Unstable { attempts }.into())
    }

    /// Glitch-resistant read.  Blocks until the clock yields a reading
    /// within `tolerance` ticks after `last`.
    ///
    /// Intentionally unbounded: a clock that never settles invalidates the
    /// session, and spinning here keeps every actuator in its last safe
    /// state.  `tolerance` must exceed the longest interval between two
    /// calls, or a healthy clock will be rejected too.
    fn now_stable(&mut self, last: Tick, tolerance: u32) -> Tick {
        loop {
            match self.read_stable(last, tolerance, STABLE_READ_ROUND) {
                Ok(tick) => return tick,
                Err(e) => warn!("clock glitch after tick {last}: {e}, still retrying"),
            }
        }
    }
}
