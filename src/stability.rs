//! Sliding-window stability detector.
//!
//! Keeps the last `W` temperatures in a fixed-capacity FIFO. The window
//! is only tested on a push that evicts, so the first verdict comes with
//! reading `W + 1`. The spread (max − min) is compared against the
//! tolerance; a spread strictly below it yields a [`Baseline`] at the
//! window mean.
//!
//! The detector does not latch. Callers stop feeding it once a baseline
//! is accepted.

use heapless::Deque;

use crate::error::ConfigError;

/// Upper bound on `base_window`. The window lives on the stack.
pub const MAX_BASE_WINDOW: usize = 512;

/// A stable resting temperature and the spread it was accepted with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub value_c: f64,
    pub spread_c: f64,
}

pub struct StabilityDetector {
    window: Deque<f64, MAX_BASE_WINDOW>,
    capacity: usize,
    tolerance_c: f64,
}

impl StabilityDetector {
    pub fn new(capacity: usize, tolerance_c: f64) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::Invalid("base_window must be >= 1"));
        }
        if capacity > MAX_BASE_WINDOW {
            return Err(ConfigError::Invalid("base_window exceeds the window capacity"));
        }
        Ok(Self {
            window: Deque::new(),
            capacity,
            tolerance_c,
        })
    }

    /// Add a reading, evicting the oldest beyond capacity. Only a push that
    /// evicted tests the window; returns the baseline if it is stable.
    pub fn push(&mut self, temperature_c: f64) -> Option<Baseline> {
        let evicted = self.window.len() == self.capacity;
        if evicted {
            self.window.pop_front();
        }
        // Cannot fail: len < capacity <= MAX_BASE_WINDOW here.
        let _ = self.window.push_back(temperature_c);

        if !evicted {
            return None;
        }
        let spread_c = self.spread()?;
        if spread_c < self.tolerance_c {
            Some(Baseline {
                value_c: self.mean()?,
                spread_c,
            })
        } else {
            None
        }
    }

    /// Max − min of the window, once it holds `capacity` readings.
    pub fn spread(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        let (min, max) = self
            .window
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &t| {
                (lo.min(t), hi.max(t))
            });
        Some(max - min)
    }

    /// Arithmetic mean of the current window contents.
    pub fn mean(&self) -> Option<f64> {
        if self.window.is_empty() {
            return None;
        }
        let sum: f64 = self.window.iter().sum();
        Some(sum / self.window.len() as f64)
    }

    pub fn is_full(&self) -> bool {
        self.window.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Window contents, oldest first.
    pub fn readings(&self) -> impl Iterator<Item = f64> + '_ {
        self.window.iter().copied()
    }
}
