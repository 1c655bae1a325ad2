//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters. No sensor or GPIO hardware is required.

mod mock_hw;
mod sensor_tests;
