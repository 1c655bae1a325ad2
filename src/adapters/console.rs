//! Operator console: phase banners and progress dots.
//!
//! One dot per recorded sample, a line break every `dots_per_line` dots.
//! The dot counter restarts with each banner.

use std::io::Write;

use log::debug;

use crate::app::events::{AppEvent, RunOutcome};
use crate::app::ports::EventSink;
use crate::config::ExperimentConfig;
use crate::fsm::Phase;

pub struct ConsoleEventSink<W> {
    out: W,
    dots_per_line: usize,
    dots: usize,
}

impl<W: Write> ConsoleEventSink<W> {
    pub fn new(out: W, dots_per_line: usize) -> Self {
        Self {
            out,
            dots_per_line: dots_per_line.max(1),
            dots: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn banner(&mut self, text: &str) {
        self.dots = 0;
        self.put(format_args!("\n=== {} ===\n", text));
    }

    fn dot(&mut self) {
        self.dots += 1;
        if self.dots % self.dots_per_line == 0 {
            self.put(format_args!(".\n"));
        } else {
            self.put(format_args!("."));
        }
    }

    fn put(&mut self, args: std::fmt::Arguments<'_>) {
        // The console is best-effort; the record file is the data contract.
        if let Err(e) = self.out.write_fmt(args).and_then(|()| self.out.flush()) {
            debug!("console write failed: {}", e);
        }
    }
}

impl<W: Write> EventSink for ConsoleEventSink<W> {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(_) => self.banner("Step 1: Setting baseline"),
            AppEvent::Sample { .. } => self.dot(),
            AppEvent::PhaseChanged { to, baseline_c, .. } => match to {
                Phase::AwaitStart => {
                    let b = baseline_c.unwrap_or(f64::NAN);
                    self.banner(&format!("Step 1 complete: Baseline {b} degrees C"));
                    self.banner("Step 2: Detect start of experiment");
                }
                Phase::Monitoring => self.banner("Step 3: Experiment in progress"),
                Phase::Complete | Phase::BaselineSearch => {}
            },
            AppEvent::Finished(summary) => {
                self.dots = 0;
                match summary.outcome {
                    RunOutcome::Completed => self.put(format_args!("\nExperiment complete.\n")),
                    RunOutcome::Cancelled => self.put(format_args!(
                        "\nExperiment cancelled in {}.\n",
                        summary.final_phase
                    )),
                    RunOutcome::TimedOut => self.put(format_args!(
                        "\nExperiment timed out in {} after {:.0} s.\n",
                        summary.final_phase, summary.elapsed_secs
                    )),
                }
            }
        }
    }
}

/// Print the effective settings before the run starts.
pub fn write_settings(
    out: &mut impl Write,
    config: &ExperimentConfig,
    outfile: &str,
) -> std::io::Result<()> {
    writeln!(out, "=== Settings ===")?;
    writeln!(out, "base_window: {}", config.base_window)?;
    writeln!(out, "base_range: {}", config.base_range)?;
    writeln!(out, "outfile: {}", outfile)?;
    writeln!(out, "start_temp_diff: {}", config.start_temp_diff)?;
    writeln!(out, "end_temp_diff: {}", config.end_temp_diff)?;
    if let Some(secs) = config.max_runtime_secs {
        writeln!(out, "max_runtime_secs: {}", secs)?;
    }
    writeln!(out)?;
    out.flush()
}
