//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter       | Implements  | Connects to                   |
//! |---------------|-------------|-------------------------------|
//! | `gpio`        | digital pins| ESP32 GPIO (`PinDriver`)      |
//! | `log_sink`    | EventSink   | `log` facade (console)        |
//! | `serial_sink` | EventSink   | record stream (UART / stdout) |
//! | `time`        | TimeSource  | ESP32 high-resolution timer   |

#[cfg(target_os = "espidf")]
pub mod gpio;
pub mod log_sink;
pub mod serial_sink;
pub mod time;
