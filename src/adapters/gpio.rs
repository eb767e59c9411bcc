//! ESP32 GPIO adapter.
//!
//! Claims the rig's pins as `esp-idf-hal` [`PinDriver`]s, which implement
//! the `embedded-hal` 1.0 digital traits every component is generic over.
//! Inputs get the internal pull-up, matching the sensor modules' open
//! collector outputs.

use esp_idf_hal::gpio::{AnyIOPin, Input, Output, PinDriver, Pull};
use log::{error, info};

use crate::error::{Error, Result};
use crate::pins;

pub type RigInput = PinDriver<'static, AnyIOPin, Input>;
pub type RigOutput = PinDriver<'static, AnyIOPin, Output>;

/// Pins for one side of the apparatus.
pub struct SidePins {
    pub ir: RigInput,
    pub touch: RigInput,
    pub solenoid: RigOutput,
}

pub struct RigPins {
    pub side_a: SidePins,
    pub side_b: SidePins,
    pub led_runtime: RigOutput,
    pub led_blink: RigOutput,
}

impl RigPins {
    /// Claim every pin listed in [`pins`].  Call once.
    pub fn take() -> Result<Self> {
        let rig = Self {
            side_a: SidePins {
                ir: input_pullup(pins::IR_A_GPIO)?,
                touch: input_pullup(pins::TOUCH_A_GPIO)?,
                solenoid: output(pins::SOLENOID_A_GPIO)?,
            },
            side_b: SidePins {
                ir: input_pullup(pins::IR_B_GPIO)?,
                touch: input_pullup(pins::TOUCH_B_GPIO)?,
                solenoid: output(pins::SOLENOID_B_GPIO)?,
            },
            led_runtime: output(pins::LED_RUNTIME_GPIO)?,
            led_blink: output(pins::LED_BLINK_GPIO)?,
        };
        info!("gpio: rig pins configured");
        Ok(rig)
    }
}

fn input_pullup(gpio: i32) -> Result<RigInput> {
    // SAFETY: every GPIO number in `pins` is distinct and claimed only
    // here, once, so no two drivers alias the same pin.
    let pin = unsafe { AnyIOPin::new(gpio) };
    let mut driver = PinDriver::input(pin).map_err(|e| {
        error!("gpio {}: input config failed: {}", gpio, e);
        Error::Init("gpio input config failed")
    })?;
    driver.set_pull(Pull::Up).map_err(|e| {
        error!("gpio {}: pull-up failed: {}", gpio, e);
        Error::Init("gpio pull-up failed")
    })?;
    Ok(driver)
}

fn output(gpio: i32) -> Result<RigOutput> {
    // SAFETY: as in `input_pullup`.
    let pin = unsafe { AnyIOPin::new(gpio) };
    PinDriver::output(pin).map_err(|e| {
        error!("gpio {}: output config failed: {}", gpio, e);
        Error::Init("gpio output config failed")
    })
}
