//! Sensor subsystem: one break-beam and one touch detector per side.
//!
//! Both detectors own their input pin and resolve the pin polarity
//! themselves, so callers only ever see logic-corrected values.  They are
//! polled once per tick with the tick's shared timestamp.

pub mod break_beam;
pub mod touch;

use embedded_hal::digital::InputPin;

use crate::config::Polarity;
use crate::error::{Result, SensorError};

/// Logic-corrected read of `pin`.  `fault` names the sensor in the error.
pub(crate) fn read_active<P: InputPin>(
    pin: &mut P,
    polarity: Polarity,
    fault: SensorError,
) -> Result<bool> {
    let high = pin.is_high().map_err(|_| fault)?;
    Ok(polarity.is_active(high))
}
