//! Two-sided behaviour rig firmware library.
//!
//! Exposes the timing engine for integration testing and host-side
//! simulation.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module; everything else
//! runs against any `embedded-hal` 1.0 pin implementation.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod clock;
pub mod config;
pub mod drivers;
pub mod error;
pub mod events;
pub mod pins;
pub mod sensors;
pub mod session;

#[cfg(test)]
mod testing;
