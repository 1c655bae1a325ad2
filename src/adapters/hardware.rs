//! Hardware adapter: pairs the sensor and indicator drivers behind the
//! domain port traits.
//!
//! The service takes a single `hw` implementing both [`SensorPort`] and
//! [`IndicatorPort`]; this adapter pairs any two implementations.

use std::time::Duration;

use crate::app::ports::{IndicatorPort, SensorPort};
use crate::error::SensorError;
use crate::fsm::context::Led;

pub struct HardwareAdapter<S, I> {
    sensor: S,
    indicator: I,
}

impl<S, I> HardwareAdapter<S, I> {
    pub fn new(sensor: S, indicator: I) -> Self {
        Self { sensor, indicator }
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<S: SensorPort, I> SensorPort for HardwareAdapter<S, I> {
    fn read(&mut self) -> Result<Option<f64>, SensorError> {
        self.sensor.read()
    }
}

// ── IndicatorPort implementation ──────────────────────────────

impl<S, I: IndicatorPort> IndicatorPort for HardwareAdapter<S, I> {
    fn pulse(&mut self, led: Led, duration: Duration) {
        self.indicator.pulse(led, duration);
    }

    fn solid_on(&mut self, led: Led) {
        self.indicator.solid_on(led);
    }

    fn solid_off(&mut self, led: Led) {
        self.indicator.solid_off(led);
    }

    fn buzz(&mut self, duration: Duration) {
        self.indicator.buzz(duration);
    }

    fn all_off(&mut self) {
        self.indicator.all_off();
    }
}
