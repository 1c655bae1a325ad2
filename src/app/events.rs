//! Outbound application events.
//!
//! The [`ExperimentService`](super::service::ExperimentService) emits
//! these through the [`EventSink`](super::ports::EventSink) port.
//! Adapters on the other side decide what to do with them.

use crate::fsm::Phase;

/// Structured events emitted by the experiment core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries the initial phase).
    Started(Phase),

    /// A non-absent sample was recorded.
    Sample {
        phase: Phase,
        timestamp: f64,
        temperature_c: f64,
    },

    /// The state machine advanced. Carries the triggering sample.
    PhaseChanged {
        from: Phase,
        to: Phase,
        timestamp: f64,
        temperature_c: f64,
        baseline_c: Option<f64>,
    },

    /// The run loop ended.
    Finished(RunSummary),
}

/// Why the run loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The Complete phase was reached.
    Completed,
    /// The cancel token was triggered.
    Cancelled,
    /// `max_runtime_secs` elapsed first.
    TimedOut,
}

/// End-of-run report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub final_phase: Phase,
    pub baseline_c: Option<f64>,
    /// Non-absent samples recorded.
    pub samples: u64,
    /// Absent samples skipped.
    pub skipped: u64,
    pub elapsed_secs: f64,
}
