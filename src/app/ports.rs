//! Port traits: the boundary between the timing engine and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Rig (domain)
//! ```
//!
//! Digital I/O crosses the boundary through the `embedded-hal` pin traits
//! owned by each component.  The two ports defined here cover what the
//! pin traits do not: where event records go, and how the supervisor
//! forces actuators into their safe state.

use crate::clock::Tick;
use crate::error::Result;
use crate::events::LogEntry;

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → serial stream / logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits every [`LogEntry`] through this port.  Adapters decide
/// where it goes (UART line stream, `log` facade, test buffer).
///
/// Emitting cannot fail from the caller's point of view: a sink that
/// loses a line reports it through its own diagnostics.
pub trait EventSink {
    fn emit(&mut self, entry: &LogEntry);
}

/// In-memory sink, used by host tests and the simulation harness.
impl EventSink for Vec<LogEntry> {
    fn emit(&mut self, entry: &LogEntry) {
        self.push(*entry);
    }
}

// ───────────────────────────────────────────────────────────────
// Fail-safe port (supervisor → actuators)
// ───────────────────────────────────────────────────────────────

/// An actuator the supervisor can force into its safe state at session end,
/// regardless of any timer the actuator is running.
pub trait FailSafe {
    /// Drive the actuator to its safe state now.  `session_start` anchors
    /// the timestamp of any event the actuator logs while doing so.
    fn force_safe(&mut self, now: Tick, session_start: Tick, sink: &mut dyn EventSink) -> Result<()>;
}
