//! Mutable context threaded through every FSM handler.
//!
//! `FsmContext` owns everything the phase handlers read and write: the
//! latest reading, the stability window, the baseline once found, the
//! configuration, and the indicator commands queued for the service to
//! apply. Nothing else mutates it.

use std::time::Duration;

use log::warn;

use crate::config::ExperimentConfig;
use crate::error::ConfigError;
use crate::stability::{Baseline, StabilityDetector};

// ---------------------------------------------------------------------------
// Reading (written by the service before each FSM tick)
// ---------------------------------------------------------------------------

/// A non-absent sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Seconds since experiment start.
    pub timestamp: f64,
    pub temperature_c: f64,
}

// ---------------------------------------------------------------------------
// Indicator commands (written by handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Indicator LEDs on the experiment board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Led {
    /// Baseline search and waiting for the experiment.
    Blue,
    /// Experiment live.
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorCommand {
    SolidOn(Led),
    SolidOff(Led),
    Buzz(Duration),
    AllOff,
}

/// One sample can enter three phases; their handlers queue six commands.
pub const MAX_QUEUED_COMMANDS: usize = 8;

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

pub struct FsmContext {
    // -- Sensor data --
    /// Latest non-absent reading.
    pub reading: Option<Reading>,

    // -- Baseline --
    pub detector: StabilityDetector,
    /// Set once, when the detector first reports a stable window.
    pub baseline: Option<Baseline>,

    // -- Indicator outputs --
    pub commands: heapless::Vec<IndicatorCommand, MAX_QUEUED_COMMANDS>,

    // -- Configuration --
    pub config: ExperimentConfig,
}

impl FsmContext {
    pub fn new(config: ExperimentConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let detector = StabilityDetector::new(config.base_window, config.base_range)?;
        Ok(Self {
            reading: None,
            detector,
            baseline: None,
            commands: heapless::Vec::new(),
            config,
        })
    }

    /// Signed difference between the latest reading and the baseline.
    /// `None` until both exist.
    pub fn delta(&self) -> Option<f64> {
        let reading = self.reading?;
        let baseline = self.baseline?;
        Some(reading.temperature_c - baseline.value_c)
    }

    /// Queue an indicator command for the service to apply.
    pub fn command(&mut self, cmd: IndicatorCommand) {
        if self.commands.push(cmd).is_err() {
            warn!("indicator queue full, dropping {:?}", cmd);
        }
    }
}
