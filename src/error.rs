//! Unified error types for the rig firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level tick loop's error handling uniform.  All variants are `Copy`
//! so they pass through the supervisor and the rig service without
//! allocation.
//!
//! The domain itself has no recoverable-error taxonomy: sensor noise is
//! absorbed by debouncing and a busy valve silently drops requests.  These
//! errors exist because `embedded-hal` GPIO access is fallible.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor pin could not be read.
    Sensor(SensorError),
    /// An actuator or indicator pin could not be driven.
    Actuator(ActuatorError),
    /// The time base could not be trusted.
    Time(TimeError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Time(e) => write!(f, "time: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Break-beam input read failed.
    BeamReadFailed,
    /// Touch input read failed.
    TouchReadFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeamReadFailed => write!(f, "break-beam GPIO read failed"),
            Self::TouchReadFailed => write!(f, "touch GPIO read failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// Solenoid valve GPIO write failed.
    ValveWriteFailed,
    /// LED GPIO write failed.
    LedWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValveWriteFailed => write!(f, "solenoid GPIO write failed"),
            Self::LedWriteFailed => write!(f, "LED GPIO write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Time-base errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeError {
    /// Every reading in a bounded stable-read round was rejected.
    Unstable { attempts: u32 },
}

impl fmt::Display for TimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unstable { attempts } => {
                write!(f, "clock unstable after {attempts} reads")
            }
        }
    }
}

impl From<TimeError> for Error {
    fn from(e: TimeError) -> Self {
        Self::Time(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
