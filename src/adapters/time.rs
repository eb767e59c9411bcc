//! System clock adapter.
//!
//! Provides the 32-bit wrapping tick counter for the rig.
//!
//! - **`target_os = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microseconds since boot, 64-bit).
//! - **`not(target_os = "espidf")`**: uses `std::time::Instant` for
//!   host-side runs and simulation.
//!
//! Either way the reading is scaled to the configured [`Resolution`] and
//! truncated to 32 bits, so it wraps exactly like a `millis()`/`micros()`
//! counter would.

use crate::clock::{Resolution, Tick, TimeSource};

pub struct SystemClock {
    resolution: Resolution,
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl SystemClock {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        // SAFETY: reads a free-running hardware timer; no preconditions.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since the adapter was created (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

/// Truncate a microsecond uptime to a tick of `resolution`.
pub fn tick_from_micros(us: u64, resolution: Resolution) -> Tick {
    let ticks = match resolution {
        Resolution::Millis => us / 1_000,
        Resolution::Micros => us,
    };
    Tick(ticks as u32)
}

impl TimeSource for SystemClock {
    fn now(&mut self) -> Tick {
        tick_from_micros(self.uptime_us(), self.resolution)
    }
}
