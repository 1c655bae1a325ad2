//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade. Samples go out at `debug`, everything else at `info`.

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that mirrors every [`AppEvent`] into the log.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(phase) => {
                info!("START | initial_phase={}", phase);
            }
            AppEvent::Sample {
                phase,
                timestamp,
                temperature_c,
            } => {
                debug!(
                    "SAMPLE | phase={} | t={:.3}s | T={:.3}\u{00b0}C",
                    phase, timestamp, temperature_c
                );
            }
            AppEvent::PhaseChanged {
                from,
                to,
                timestamp,
                temperature_c,
                baseline_c,
            } => {
                let delta = baseline_c.map(|b| temperature_c - b);
                info!(
                    "PHASE | {} -> {} | t={:.3}s | T={:.3}\u{00b0}C | baseline={:?} | delta={:?}",
                    from, to, timestamp, temperature_c, baseline_c, delta
                );
            }
            AppEvent::Finished(s) => {
                info!(
                    "FINISH | outcome={:?} | phase={} | baseline={:?} | samples={} skipped={} | {:.1}s",
                    s.outcome, s.final_phase, s.baseline_c, s.samples, s.skipped, s.elapsed_secs
                );
            }
        }
    }
}
