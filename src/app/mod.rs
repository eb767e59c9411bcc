//! Application core: the rig's timing logic, free of platform I/O.
//!
//! Hardware reaches this layer only as `embedded-hal` pins owned by the
//! components and through the port traits in [`ports`], so the whole
//! service runs on the host against simulated pins.

pub mod ports;
pub mod service;
