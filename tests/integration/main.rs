//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the assembled rig
//! against mock pins and a scripted clock.  All tests run on the host
//! with no real hardware required.

mod mock_hw;
mod rig_tests;
mod session_tests;
