//! Function-pointer finite state machine engine.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StateTable                                                  │
//! │  ┌────────────────┬───────────┬──────────┬─────────────────┐ │
//! │  │ Phase          │ on_enter  │ on_exit  │ on_update       │ │
//! │  ├────────────────┼───────────┼──────────┼─────────────────┤ │
//! │  │ BaselineSearch │ fn(ctx)   │ -        │ fn(ctx)->Option │ │
//! │  │ AwaitStart     │ fn(ctx)   │ -        │ fn(ctx)->Option │ │
//! │  │ Monitoring     │ fn(ctx)   │ -        │ fn(ctx)->Option │ │
//! │  │ Complete       │ fn(ctx)   │ -        │ fn(ctx)->Option │ │
//! │  └────────────────┴───────────┴──────────┴─────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine is ticked once per **non-absent** sample. It calls
//! `on_update` for the current phase; `Some(next)` runs `on_exit` for the
//! current phase, then `on_enter` for the next. The newly entered phase's
//! `on_update` then sees the same sample, so one reading can cross several
//! thresholds in a single tick. Phases only ever advance to their direct
//! successor.

pub mod context;
pub mod states;

use core::fmt;
use std::time::Duration;

use context::{FsmContext, Led};
use log::{error, info};

use crate::config::ExperimentConfig;

// ---------------------------------------------------------------------------
// Phase identity
// ---------------------------------------------------------------------------

/// The experiment phases, in protocol order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Phase {
    BaselineSearch = 0,
    AwaitStart = 1,
    Monitoring = 2,
    Complete = 3,
}

impl Phase {
    /// Number of phases, and the state table length.
    pub const COUNT: usize = 4;

    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::BaselineSearch,
            1 => Self::AwaitStart,
            2 => Self::Monitoring,
            3 => Self::Complete,
            _ => {
                debug_assert!(false, "invalid phase index: {idx}");
                Self::Complete
            }
        }
    }

    /// The only phase this one may transition to.
    pub fn successor(self) -> Option<Self> {
        match self {
            Self::BaselineSearch => Some(Self::AwaitStart),
            Self::AwaitStart => Some(Self::Monitoring),
            Self::Monitoring => Some(Self::Complete),
            Self::Complete => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Complete
    }

    /// Sleep before the read, plus the LED flashed once the sleep ends.
    pub fn tick_plan(self, config: &ExperimentConfig) -> TickPlan {
        match self {
            Self::BaselineSearch => TickPlan {
                delay: config.baseline_tick(),
                pulse: Some(Led::Blue),
            },
            Self::AwaitStart => TickPlan {
                delay: config.await_tick(),
                pulse: None,
            },
            Self::Monitoring => TickPlan {
                delay: config.monitor_tick(),
                pulse: Some(Led::Red),
            },
            Self::Complete => TickPlan {
                delay: Duration::ZERO,
                pulse: None,
            },
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BaselineSearch => "BaselineSearch",
            Self::AwaitStart => "AwaitStart",
            Self::Monitoring => "Monitoring",
            Self::Complete => "Complete",
        };
        f.write_str(name)
    }
}

/// Phases entered during one tick, in order.
pub type Entered = heapless::Vec<Phase, { Phase::COUNT - 1 }>;

/// Per-phase polling cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickPlan {
    pub delay: Duration,
    pub pulse: Option<Led>,
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut FsmContext);

/// Signature for the per-sample update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<Phase>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

pub struct StateDescriptor {
    pub id: Phase,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Fixed-size table indexed by `Phase as usize`.
    table: [StateDescriptor; Phase::COUNT],
    current: usize,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; Phase::COUNT], initial: Phase) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting phase.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in phase: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM with the sample currently held in `ctx.reading`,
    /// re-evaluating it in each phase it enters. Returns the phases
    /// entered, empty if none.
    pub fn tick(&mut self, ctx: &mut FsmContext) -> Entered {
        let mut entered = Entered::new();
        while let Some(next) = (self.table[self.current].on_update)(ctx) {
            if !self.transition(next, ctx) {
                break;
            }
            // Successor-only moves bound this at COUNT - 1.
            let _ = entered.push(next);
        }
        entered
    }

    pub fn current_phase(&self) -> Phase {
        Phase::from_index(self.current)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next: Phase, ctx: &mut FsmContext) -> bool {
        let current = self.current_phase();
        if current.successor() != Some(next) {
            error!("FSM rejected out-of-order transition: {} -> {}", current, next);
            return false;
        }
        let next_idx = next as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
        true
    }
}
