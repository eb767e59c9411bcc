//! GPIO assignments for the rig interface board.
//!
//! Single source of truth: the GPIO adapter builds every pin driver from this
//! module rather than hard-coding pin numbers.
//!
//! ```text
//!   side A (0):  IR 5   touch 6   solenoid 7
//!   side B (1):  IR 8   touch 9   solenoid 10
//! ```

// ---------------------------------------------------------------------------
// Side A
// ---------------------------------------------------------------------------

/// Break-beam receiver, input with pull-up.
pub const IR_A_GPIO: i32 = 5;
/// Capacitive touch sensor output, input with pull-up.
pub const TOUCH_A_GPIO: i32 = 6;
/// Solenoid valve driver gate.
pub const SOLENOID_A_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Side B
// ---------------------------------------------------------------------------

pub const IR_B_GPIO: i32 = 8;
pub const TOUCH_B_GPIO: i32 = 9;
pub const SOLENOID_B_GPIO: i32 = 10;

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// Lit for the whole session.
pub const LED_RUNTIME_GPIO: i32 = 13;
/// Free-running blink (side A marker).
pub const LED_BLINK_GPIO: i32 = 12;
