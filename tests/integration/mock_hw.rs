//! Mock adapters for integration tests.
//!
//! A scripted sensor that also records every indicator call, a fake
//! clock that advances only when slept, and sinks that keep everything
//! they are given.

use std::collections::VecDeque;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use thermotrack::app::ports::{EventSink, IndicatorPort, RecordSink, SensorPort, TimePort};
use thermotrack::error::{OutputError, SensorError};
use thermotrack::fsm::context::Led;
use thermotrack::{AppEvent, CancelToken, Phase};

// ── MockHardware ──────────────────────────────────────────────

/// One indicator port call, as the mock saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Pulse(Led, Duration),
    SolidOn(Led),
    SolidOff(Led),
    Buzz(Duration),
    AllOff,
}

/// Plays back a fixed list of sensor results.
///
/// Once the script runs dry the mock either cancels `cancel_on_exhaust`
/// and reports an absent sample, or fails with `Unavailable`.
pub struct MockHardware {
    script: VecDeque<Result<Option<f64>, SensorError>>,
    pub calls: Vec<Call>,
    pub reads: usize,
    cancel_on_exhaust: Option<CancelToken>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(readings: &[Option<f64>]) -> Self {
        Self {
            script: readings.iter().copied().map(Ok).collect(),
            calls: Vec::new(),
            reads: 0,
            cancel_on_exhaust: None,
        }
    }

    pub fn with_results(script: Vec<Result<Option<f64>, SensorError>>) -> Self {
        Self {
            script: script.into(),
            calls: Vec::new(),
            reads: 0,
            cancel_on_exhaust: None,
        }
    }

    pub fn cancel_when_exhausted(mut self, token: CancelToken) -> Self {
        self.cancel_on_exhaust = Some(token);
        self
    }

    pub fn last_call(&self) -> Option<&Call> {
        self.calls.last()
    }

    /// Calls other than the per-tick pulses.
    pub fn state_changes(&self) -> Vec<Call> {
        self.calls
            .iter()
            .copied()
            .filter(|c| !matches!(c, Call::Pulse(..)))
            .collect()
    }

    pub fn pulses(&self, led: Led) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Pulse(l, _) if *l == led))
            .count()
    }
}

impl SensorPort for MockHardware {
    fn read(&mut self) -> Result<Option<f64>, SensorError> {
        self.reads += 1;
        match self.script.pop_front() {
            Some(result) => result,
            None => match &self.cancel_on_exhaust {
                Some(token) => {
                    token.cancel();
                    Ok(None)
                }
                None => Err(SensorError::Unavailable { attempts: 1 }),
            },
        }
    }
}

impl IndicatorPort for MockHardware {
    fn pulse(&mut self, led: Led, duration: Duration) {
        self.calls.push(Call::Pulse(led, duration));
    }

    fn solid_on(&mut self, led: Led) {
        self.calls.push(Call::SolidOn(led));
    }

    fn solid_off(&mut self, led: Led) {
        self.calls.push(Call::SolidOff(led));
    }

    fn buzz(&mut self, duration: Duration) {
        self.calls.push(Call::Buzz(duration));
    }

    fn all_off(&mut self) {
        self.calls.push(Call::AllOff);
    }
}

// ── FakeClock ─────────────────────────────────────────────────

/// Time only moves when the service sleeps.
#[derive(Default)]
pub struct FakeClock {
    now: Duration,
    pub sleeps: Vec<Duration>,
}

#[allow(dead_code)]
impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimePort for FakeClock {
    fn elapsed_secs(&self) -> f64 {
        self.now.as_secs_f64()
    }

    fn sleep(&mut self, duration: Duration) {
        self.now += duration;
        self.sleeps.push(duration);
    }
}

/// Delay that returns at once.
#[derive(Default, Clone, Copy)]
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

// ── Recording sinks ───────────────────────────────────────────

#[derive(Default)]
pub struct MemoryRecords {
    pub headers: usize,
    pub rows: Vec<(f64, f64)>,
}

#[allow(dead_code)]
impl MemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperatures(&self) -> Vec<f64> {
        self.rows.iter().map(|&(_, t)| t).collect()
    }
}

impl RecordSink for MemoryRecords {
    fn write_header(&mut self) -> Result<(), OutputError> {
        self.headers += 1;
        Ok(())
    }

    fn record(&mut self, timestamp: f64, temperature_c: f64) -> Result<(), OutputError> {
        self.rows.push((timestamp, temperature_c));
        Ok(())
    }
}

#[derive(Default)]
pub struct EventLog {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(from, to)` of every phase change, in order.
    pub fn transitions(&self) -> Vec<(Phase, Phase)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::PhaseChanged { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
