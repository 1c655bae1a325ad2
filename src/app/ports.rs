//! Port traits — the hexagonal boundary between the experiment core and
//! the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ExperimentService (domain)
//! ```
//!
//! Driven adapters (the w1 sensor, GPIO indicators, the TSV record file,
//! the console) implement these traits. The
//! [`ExperimentService`](super::service::ExperimentService) consumes them
//! via generics, so the core never touches hardware directly.

use std::time::Duration;

use crate::error::{OutputError, SensorError};
use crate::fsm::context::{IndicatorCommand, Led};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one temperature sample per call.
pub trait SensorPort {
    /// `Ok(None)` means the sensor was transiently unreadable and the
    /// sample should be skipped. `Err(SensorError::Cancelled)` ends the
    /// run as cancelled; any other `Err` aborts it.
    fn read(&mut self) -> Result<Option<f64>, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → LEDs / buzzer)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the indicator LEDs and buzzer.
///
/// Pin failures are the adapter's to log; the experiment keeps running
/// without its lights.
pub trait IndicatorPort {
    /// Switch `led` on for `duration`, then off. Blocks for `duration`.
    fn pulse(&mut self, led: Led, duration: Duration);

    fn solid_on(&mut self, led: Led);

    fn solid_off(&mut self, led: Led);

    /// Sound the buzzer for `duration`. Blocks for `duration`.
    fn buzz(&mut self, duration: Duration);

    /// Everything off.
    fn all_off(&mut self);

    /// Execute a command queued by a phase handler.
    fn apply(&mut self, cmd: IndicatorCommand) {
        match cmd {
            IndicatorCommand::SolidOn(led) => self.solid_on(led),
            IndicatorCommand::SolidOff(led) => self.solid_off(led),
            IndicatorCommand::Buzz(duration) => self.buzz(duration),
            IndicatorCommand::AllOff => self.all_off(),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Record sink port (driven adapter: domain → data file)
// ───────────────────────────────────────────────────────────────

/// The experiment's data contract: every non-absent sample, in order.
pub trait RecordSink {
    /// Written once, before any record.
    fn write_header(&mut self) -> Result<(), OutputError>;

    fn record(&mut self, timestamp: f64, temperature_c: f64) -> Result<(), OutputError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → console / logging)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &super::events::AppEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

// ───────────────────────────────────────────────────────────────
// Time port (driven adapter: domain ↔ clock)
// ───────────────────────────────────────────────────────────────

/// Experiment clock and the tick sleeps.
pub trait TimePort {
    /// Seconds since the experiment started.
    fn elapsed_secs(&self) -> f64;

    /// Block for `duration`. May return early if the run is cancelled.
    fn sleep(&mut self, duration: Duration);
}
