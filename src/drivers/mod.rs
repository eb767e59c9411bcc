//! Actuator and indicator drivers.

pub mod blink;
pub mod solenoid;
pub mod status_led;
pub mod watchdog;
