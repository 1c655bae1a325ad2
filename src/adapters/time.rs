//! Host time adapters.
//!
//! - [`StdClock`] — the experiment clock ([`TimePort`]): monotonic
//!   seconds since construction and cancel-aware tick sleeps.
//! - [`StdDelay`] — blocking `embedded-hal` delay for drivers (indicator
//!   pulses, sensor re-checks).

use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;

use crate::app::cancel::CancelToken;
use crate::app::ports::TimePort;

/// Granularity of cancel checks while sleeping.
const SLEEP_SLICE: Duration = Duration::from_millis(50);

pub struct StdClock {
    start: Instant,
    cancel: Option<CancelToken>,
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl StdClock {
    /// Time zero is now.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            cancel: None,
        }
    }

    /// Wake early from sleeps once `cancel` fires.
    pub fn with_cancel(cancel: CancelToken) -> Self {
        Self {
            start: Instant::now(),
            cancel: Some(cancel),
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

impl TimePort for StdClock {
    fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    fn sleep(&mut self, duration: Duration) {
        if self.cancel.is_none() {
            std::thread::sleep(duration);
            return;
        }
        let deadline = Instant::now() + duration;
        while !self.cancelled() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            std::thread::sleep(remaining.min(SLEEP_SLICE));
        }
    }
}

/// `thread::sleep`-backed delay.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}
