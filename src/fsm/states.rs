//! Concrete phase handler functions and table builder.
//!
//! Each phase is three plain `fn` pointers. Handlers never touch
//! hardware; they queue [`IndicatorCommand`]s that the service applies.
//!
//! The sample that triggers a transition is handed to the next phase's
//! update as well, so a threshold already met is acted on immediately.
//!
//! ```text
//!  BASELINE_SEARCH ──[window spread < base_range]──▶ AWAIT_START
//!                                                        │
//!                                     [delta >= start_temp_diff]
//!                                                        ▼
//!  COMPLETE ◀──────[delta <= end_temp_diff]────────── MONITORING
//! ```

use std::time::Duration;

use super::context::{FsmContext, IndicatorCommand, Led};
use super::{Phase, StateDescriptor};
use log::info;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static phase table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; Phase::COUNT] {
    [
        // Index 0 — BaselineSearch
        StateDescriptor {
            id: Phase::BaselineSearch,
            name: "BaselineSearch",
            on_enter: Some(baseline_enter),
            on_exit: None,
            on_update: baseline_update,
        },
        // Index 1 — AwaitStart
        StateDescriptor {
            id: Phase::AwaitStart,
            name: "AwaitStart",
            on_enter: Some(await_start_enter),
            on_exit: None,
            on_update: await_start_update,
        },
        // Index 2 — Monitoring
        StateDescriptor {
            id: Phase::Monitoring,
            name: "Monitoring",
            on_enter: Some(monitoring_enter),
            on_exit: None,
            on_update: monitoring_update,
        },
        // Index 3 — Complete
        StateDescriptor {
            id: Phase::Complete,
            name: "Complete",
            on_enter: Some(complete_enter),
            on_exit: None,
            on_update: complete_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  BASELINE_SEARCH — waiting for a quiet window
// ═══════════════════════════════════════════════════════════════════════════

fn baseline_enter(ctx: &mut FsmContext) {
    info!(
        "BASELINE: need {} readings within {} \u{00b0}C",
        ctx.config.base_window, ctx.config.base_range
    );
}

fn baseline_update(ctx: &mut FsmContext) -> Option<Phase> {
    let reading = ctx.reading?;
    let baseline = ctx.detector.push(reading.temperature_c)?;
    info!(
        "BASELINE: {:.3} \u{00b0}C (spread {:.3}) at t={:.1}s",
        baseline.value_c, baseline.spread_c, reading.timestamp
    );
    ctx.baseline = Some(baseline);
    Some(Phase::AwaitStart)
}

// ═══════════════════════════════════════════════════════════════════════════
//  AWAIT_START — baseline held, waiting for the divergence
// ═══════════════════════════════════════════════════════════════════════════

fn await_start_enter(ctx: &mut FsmContext) {
    ctx.command(IndicatorCommand::SolidOn(Led::Blue));
    ctx.command(IndicatorCommand::Buzz(Duration::from_millis(
        ctx.config.baseline_buzz_ms,
    )));
    info!(
        "AWAIT_START: waiting for delta >= {} \u{00b0}C",
        ctx.config.start_temp_diff
    );
}

fn await_start_update(ctx: &mut FsmContext) -> Option<Phase> {
    let delta = ctx.delta()?;
    // Literal signed comparison, also for negative thresholds.
    if delta >= ctx.config.start_temp_diff {
        info!(
            "AWAIT_START: delta {:.3} >= {} \u{00b0}C, experiment started",
            delta, ctx.config.start_temp_diff
        );
        return Some(Phase::Monitoring);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  MONITORING — experiment live, waiting for the return
// ═══════════════════════════════════════════════════════════════════════════

fn monitoring_enter(ctx: &mut FsmContext) {
    ctx.command(IndicatorCommand::SolidOff(Led::Blue));
    info!(
        "MONITORING: waiting for delta <= {} \u{00b0}C",
        ctx.config.end_temp_diff
    );
}

fn monitoring_update(ctx: &mut FsmContext) -> Option<Phase> {
    let delta = ctx.delta()?;
    if delta <= ctx.config.end_temp_diff {
        info!(
            "MONITORING: delta {:.3} <= {} \u{00b0}C, experiment complete",
            delta, ctx.config.end_temp_diff
        );
        return Some(Phase::Complete);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  COMPLETE — terminal
// ═══════════════════════════════════════════════════════════════════════════

fn complete_enter(ctx: &mut FsmContext) {
    ctx.command(IndicatorCommand::SolidOn(Led::Red));
    ctx.command(IndicatorCommand::Buzz(Duration::from_millis(
        ctx.config.complete_buzz_ms,
    )));
    ctx.command(IndicatorCommand::AllOff);
    if let Some(reading) = ctx.reading {
        info!("COMPLETE: experiment ended at t={:.1}s", reading.timestamp);
    }
}

fn complete_update(_ctx: &mut FsmContext) -> Option<Phase> {
    None
}
