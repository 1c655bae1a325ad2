//! Experiment configuration parameters
//!
//! All tunable parameters for a tracking run. Defaults match the bench
//! setup; values can be overridden from a JSON file and then from the
//! command line.

use core::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::stability::MAX_BASE_WINDOW;

/// Core experiment configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    // --- Baseline ---
    /// Count of consecutive readings that must agree to set the baseline
    pub base_window: usize,
    /// Maximal spread (°C) across `base_window` readings to set the baseline
    pub base_range: f64,

    // --- Phase thresholds ---
    /// Signed difference from baseline (°C) that starts the experiment
    pub start_temp_diff: f64,
    /// Signed difference from baseline (°C) that ends the experiment
    pub end_temp_diff: f64,

    // --- Timing ---
    /// Delay before each baseline-search read (milliseconds)
    pub baseline_tick_ms: u64,
    /// Delay before each await-start read (milliseconds)
    pub await_tick_ms: u64,
    /// Delay before each monitoring read (milliseconds)
    pub monitor_tick_ms: u64,
    /// Length of the per-tick indicator flash (milliseconds)
    pub pulse_ms: u64,
    /// Buzz when the baseline is found (milliseconds)
    pub baseline_buzz_ms: u64,
    /// Buzz when the experiment completes (milliseconds)
    pub complete_buzz_ms: u64,

    // --- Sensor ---
    /// Delay between readiness re-checks (milliseconds)
    pub sensor_retry_delay_ms: u64,
    /// Readiness attempts per read before giving up; `None` = retry forever
    pub sensor_max_attempts: Option<u32>,

    // --- Operator console ---
    /// Progress dots per console line
    pub dots_per_line: usize,
    /// Stop the run once the experiment clock passes this many seconds
    pub max_runtime_secs: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            // Baseline
            base_window: 5,
            base_range: 0.1,

            // Thresholds
            start_temp_diff: 5.0,
            end_temp_diff: 1.0,

            // Timing
            baseline_tick_ms: 900,
            await_tick_ms: 1000,
            monitor_tick_ms: 900,
            pulse_ms: 100,
            baseline_buzz_ms: 250,
            complete_buzz_ms: 1000,

            // Sensor
            sensor_retry_delay_ms: 200,
            sensor_max_attempts: Some(50), // ~10 s of re-checks

            // Console
            dots_per_line: 80,
            max_runtime_secs: None,
        }
    }
}

/// Non-fatal configuration smells, reported before the run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `start_temp_diff` and `end_temp_diff` have opposite signs.
    MismatchedSigns,
    /// `|start_temp_diff| < |end_temp_diff|`; the run may never end.
    EndExceedsStart,
    /// A negative start threshold is compared as `delta >= start`, which
    /// holds for any reading above `baseline + start_temp_diff`.
    NegativeStartThreshold,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MismatchedSigns => {
                write!(f, "`start_temp_diff` and `end_temp_diff` should have identical signs")
            }
            Self::EndExceedsStart => write!(
                f,
                "`start_temp_diff` should be larger than `end_temp_diff` to avoid an infinite loop"
            ),
            Self::NegativeStartThreshold => write!(
                f,
                "negative `start_temp_diff` is compared as `delta >= start_temp_diff` and fires on any reading not below it"
            ),
        }
    }
}

impl ExperimentConfig {
    /// Reject values the core cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_window == 0 {
            return Err(ConfigError::Invalid("base_window must be >= 1"));
        }
        if self.base_window > MAX_BASE_WINDOW {
            return Err(ConfigError::Invalid("base_window exceeds the window capacity"));
        }
        if !self.base_range.is_finite() || self.base_range <= 0.0 {
            return Err(ConfigError::Invalid("base_range must be a positive number"));
        }
        if !self.start_temp_diff.is_finite() {
            return Err(ConfigError::Invalid("start_temp_diff must be finite"));
        }
        if !self.end_temp_diff.is_finite() {
            return Err(ConfigError::Invalid("end_temp_diff must be finite"));
        }
        if self.sensor_retry_delay_ms == 0 {
            return Err(ConfigError::Invalid("sensor_retry_delay_ms must be > 0"));
        }
        if self.sensor_max_attempts == Some(0) {
            return Err(ConfigError::Invalid("sensor_max_attempts must be >= 1"));
        }
        if self.dots_per_line == 0 {
            return Err(ConfigError::Invalid("dots_per_line must be >= 1"));
        }
        Ok(())
    }

    /// Threshold combinations that are legal but probably a mistake.
    pub fn sanity_warnings(&self) -> heapless::Vec<ConfigWarning, 3> {
        let mut warnings = heapless::Vec::new();
        if self.start_temp_diff * self.end_temp_diff < 0.0 {
            let _ = warnings.push(ConfigWarning::MismatchedSigns);
        }
        if self.start_temp_diff.abs() < self.end_temp_diff.abs() {
            let _ = warnings.push(ConfigWarning::EndExceedsStart);
        }
        if self.start_temp_diff < 0.0 {
            let _ = warnings.push(ConfigWarning::NegativeStartThreshold);
        }
        warnings
    }

    pub fn baseline_tick(&self) -> Duration {
        Duration::from_millis(self.baseline_tick_ms)
    }

    pub fn await_tick(&self) -> Duration {
        Duration::from_millis(self.await_tick_ms)
    }

    pub fn monitor_tick(&self) -> Duration {
        Duration::from_millis(self.monitor_tick_ms)
    }

    pub fn pulse(&self) -> Duration {
        Duration::from_millis(self.pulse_ms)
    }

    pub fn max_runtime(&self) -> Option<Duration> {
        self.max_runtime_secs.map(Duration::from_secs)
    }
}
