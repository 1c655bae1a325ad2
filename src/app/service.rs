//! Application service — the hexagonal core.
//!
//! [`ExperimentService`] owns the FSM and its context. It drives the
//! polling loop: sleep for the phase's tick, flash the phase indicator,
//! read the sensor, record the sample, advance the FSM, apply any
//! indicator commands the transition queued. All I/O flows through port
//! traits injected at call sites.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ RecordSink
//!                 │   ExperimentService     │ ──▶ EventSink
//! IndicatorPort ◀─│  FSM · StabilityDetector│
//!                 └────────────────────────┘ ◀── TimePort
//! ```

use log::{debug, error, info, warn};

use crate::config::ExperimentConfig;
use crate::error::{ConfigError, Result, SensorError};
use crate::fsm::context::{FsmContext, Reading};
use crate::fsm::states::build_state_table;
use crate::fsm::{Entered, Fsm, Phase};

use super::cancel::CancelToken;
use super::events::{AppEvent, RunOutcome, RunSummary};
use super::ports::{EventSink, IndicatorPort, RecordSink, SensorPort, TimePort};

/// Result of a single polling tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The sensor had no usable value; nothing was recorded.
    Skipped,
    /// A sample was recorded. Carries the phases it moved through, in order.
    Sampled(Entered),
    /// The cancel token fired during the tick sleep or a sensor retry wait.
    Cancelled,
}

// ───────────────────────────────────────────────────────────────
// ExperimentService
// ───────────────────────────────────────────────────────────────

pub struct ExperimentService {
    fsm: Fsm,
    ctx: FsmContext,
    cancel: CancelToken,
    samples: u64,
    skipped: u64,
}

impl ExperimentService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) or
    /// [`run`](Self::run) next.
    pub fn new(config: ExperimentConfig) -> core::result::Result<Self, ConfigError> {
        let ctx = FsmContext::new(config)?;
        let fsm = Fsm::new(build_state_table(), Phase::BaselineSearch);
        Ok(Self {
            fsm,
            ctx,
            cancel: CancelToken::new(),
            samples: 0,
            skipped: 0,
        })
    }

    /// Share a cancel token with the caller (and the clock adapter).
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Report config warnings, write the record header and enter the
    /// initial phase.
    pub fn start(
        &mut self,
        records: &mut impl RecordSink,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        for warning in self.ctx.config.sanity_warnings() {
            warn!("config: {}", warning);
        }
        records.write_header()?;
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_phase()));
        info!("ExperimentService started in {}", self.fsm.current_phase());
        Ok(())
    }

    /// Drive the loop until Complete, cancellation, or the runtime limit.
    ///
    /// Indicators are switched off on every exit path, including errors.
    pub fn run(
        &mut self,
        hw: &mut (impl SensorPort + IndicatorPort),
        time: &mut impl TimePort,
        records: &mut impl RecordSink,
        sink: &mut impl EventSink,
    ) -> Result<RunSummary> {
        self.start(records, sink)?;
        let max_runtime = self.ctx.config.max_runtime();

        let outcome = loop {
            if self.fsm.current_phase().is_terminal() {
                break RunOutcome::Completed;
            }
            if self.cancel.is_cancelled() {
                break RunOutcome::Cancelled;
            }
            if let Some(limit) = max_runtime {
                if time.elapsed_secs() >= limit.as_secs_f64() {
                    warn!("max runtime of {}s reached", limit.as_secs());
                    break RunOutcome::TimedOut;
                }
            }
            match self.tick(hw, time, records, sink) {
                Ok(TickOutcome::Cancelled) => break RunOutcome::Cancelled,
                Ok(_) => {}
                Err(e) => {
                    error!("run aborted in {}: {}", self.fsm.current_phase(), e);
                    hw.all_off();
                    return Err(e);
                }
            }
        };

        if outcome != RunOutcome::Completed {
            hw.all_off();
        }
        let summary = self.summary(outcome, time.elapsed_secs());
        sink.emit(&AppEvent::Finished(summary));
        info!(
            "run finished: {:?} after {} samples ({} skipped)",
            summary.outcome, summary.samples, summary.skipped
        );
        Ok(summary)
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one polling tick: sleep → pulse → read → record → FSM.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`IndicatorPort`], so one `&mut` reaches both.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + IndicatorPort),
        time: &mut impl TimePort,
        records: &mut impl RecordSink,
        sink: &mut impl EventSink,
    ) -> Result<TickOutcome> {
        let phase = self.fsm.current_phase();
        let plan = phase.tick_plan(&self.ctx.config);

        // 1. Tick delay and phase indicator
        time.sleep(plan.delay);
        if self.cancel.is_cancelled() {
            return Ok(TickOutcome::Cancelled);
        }
        if let Some(led) = plan.pulse {
            hw.pulse(led, self.ctx.config.pulse());
        }

        // 2. Read; the timestamp is taken as close to the read as possible
        let read = match hw.read() {
            Err(SensorError::Cancelled) => return Ok(TickOutcome::Cancelled),
            read => read?,
        };
        let Some(temperature_c) = read else {
            self.skipped += 1;
            debug!("{}: no reading, skipping tick", phase);
            return Ok(TickOutcome::Skipped);
        };
        let timestamp = time.elapsed_secs();

        // 3. Record before evaluating, so the triggering sample is logged
        records.record(timestamp, temperature_c)?;
        self.samples += 1;
        sink.emit(&AppEvent::Sample {
            phase,
            timestamp,
            temperature_c,
        });

        // 4. FSM tick (pure phase logic)
        self.ctx.reading = Some(Reading {
            timestamp,
            temperature_c,
        });
        let entered = self.fsm.tick(&mut self.ctx);

        // 5. Announce each step, then apply indicator commands
        let mut from = phase;
        for &to in entered.iter() {
            sink.emit(&AppEvent::PhaseChanged {
                from,
                to,
                timestamp,
                temperature_c,
                baseline_c: self.baseline_c(),
            });
            from = to;
        }
        for cmd in self.ctx.commands.iter().copied() {
            hw.apply(cmd);
        }
        self.ctx.commands.clear();

        Ok(TickOutcome::Sampled(entered))
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.fsm.current_phase()
    }

    /// The baseline temperature, once found.
    pub fn baseline_c(&self) -> Option<f64> {
        self.ctx.baseline.map(|b| b.value_c)
    }

    /// Non-absent samples recorded so far.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Absent samples skipped so far.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.ctx.config
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    fn summary(&self, outcome: RunOutcome, elapsed_secs: f64) -> RunSummary {
        RunSummary {
            outcome,
            final_phase: self.fsm.current_phase(),
            baseline_c: self.baseline_c(),
            samples: self.samples,
            skipped: self.skipped,
            elapsed_secs,
        }
    }
}
