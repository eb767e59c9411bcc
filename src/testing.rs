//! Simulated pins for unit tests.
//!
//! Clones share state, so a test keeps one handle to drive (or inspect)
//! the level while the component under test owns the other.

use core::cell::Cell;
use core::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin};

/// Input pin whose raw level the test sets directly.  A faulted pin
/// fails every read until the fault is cleared.
#[derive(Debug, Clone, Default)]
pub struct SimInput {
    level: Rc<Cell<bool>>,
    fault: Rc<Cell<bool>>,
}

impl SimInput {
    pub fn set(&self, high: bool) {
        self.level.set(high);
    }

    pub fn set_fault(&self, fault: bool) {
        self.fault.set(fault);
    }

    fn read(&self) -> Result<bool, PinFault> {
        if self.fault.get() { Err(PinFault) } else { Ok(self.level.get()) }
    }
}

impl ErrorType for SimInput {
    type Error = PinFault;
}

impl InputPin for SimInput {
    fn is_high(&mut self) -> Result<bool, PinFault> {
        self.read()
    }

    fn is_low(&mut self) -> Result<bool, PinFault> {
        self.read().map(|high| !high)
    }
}

/// Output pin that records its level and write count.
#[derive(Debug, Clone, Default)]
pub struct SimOutput {
    high: Rc<Cell<bool>>,
    writes: Rc<Cell<u32>>,
}

impl SimOutput {
    pub fn is_high(&self) -> bool {
        self.high.get()
    }

    pub fn writes(&self) -> u32 {
        self.writes.get()
    }
}

impl ErrorType for SimOutput {
    type Error = Infallible;
}

impl OutputPin for SimOutput {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high.set(false);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.high.set(true);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

#[derive(Debug)]
pub struct PinFault;

impl digital::Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Pin whose every access fails.
#[derive(Debug, Default)]
pub struct BrokenPin;

impl ErrorType for BrokenPin {
    type Error = PinFault;
}

impl InputPin for BrokenPin {
    fn is_high(&mut self) -> Result<bool, PinFault> {
        Err(PinFault)
    }

    fn is_low(&mut self) -> Result<bool, PinFault> {
        Err(PinFault)
    }
}

impl OutputPin for BrokenPin {
    fn set_low(&mut self) -> Result<(), PinFault> {
        Err(PinFault)
    }

    fn set_high(&mut self) -> Result<(), PinFault> {
        Err(PinFault)
    }
}
