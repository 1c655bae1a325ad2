//! LED and buzzer indicator drivers.
//!
//! [`PinIndicator`] drives two LEDs and a buzzer through any
//! `embedded-hal` [`OutputPin`]s and blocks on a [`DelayNs`] for
//! pulses and buzzes. [`LogIndicator`] keeps the same timing but only
//! logs, for runs without GPIO access.

use std::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::{debug, warn};

use crate::app::ports::IndicatorPort;
use crate::fsm::context::Led;

fn duration_ms(duration: Duration) -> u32 {
    duration.as_millis().min(u128::from(u32::MAX)) as u32
}

/// Set a pin, logging rather than propagating failures.
fn drive<P: OutputPin>(pin: &mut P, high: bool, label: &str) {
    let result = if high { pin.set_high() } else { pin.set_low() };
    if let Err(e) = result {
        warn!("indicator {}: pin write failed: {:?}", label, e);
    }
}

// ───────────────────────────────────────────────────────────────
// GPIO indicator
// ───────────────────────────────────────────────────────────────

pub struct PinIndicator<R, B, Z, D> {
    red: R,
    blue: B,
    buzzer: Z,
    delay: D,
}

impl<R, B, Z, D> PinIndicator<R, B, Z, D>
where
    R: OutputPin,
    B: OutputPin,
    Z: OutputPin,
    D: DelayNs,
{
    /// Takes ownership of the pins and drives them all low.
    pub fn new(red: R, blue: B, buzzer: Z, delay: D) -> Self {
        let mut indicator = Self {
            red,
            blue,
            buzzer,
            delay,
        };
        indicator.all_off();
        indicator
    }

    /// Release the pins.
    pub fn into_parts(self) -> (R, B, Z, D) {
        (self.red, self.blue, self.buzzer, self.delay)
    }

    fn set_led(&mut self, led: Led, high: bool) {
        match led {
            Led::Red => drive(&mut self.red, high, "red"),
            Led::Blue => drive(&mut self.blue, high, "blue"),
        }
    }
}

impl<R, B, Z, D> IndicatorPort for PinIndicator<R, B, Z, D>
where
    R: OutputPin,
    B: OutputPin,
    Z: OutputPin,
    D: DelayNs,
{
    fn pulse(&mut self, led: Led, duration: Duration) {
        self.set_led(led, true);
        self.delay.delay_ms(duration_ms(duration));
        self.set_led(led, false);
    }

    fn solid_on(&mut self, led: Led) {
        self.set_led(led, true);
    }

    fn solid_off(&mut self, led: Led) {
        self.set_led(led, false);
    }

    fn buzz(&mut self, duration: Duration) {
        drive(&mut self.buzzer, true, "buzzer");
        self.delay.delay_ms(duration_ms(duration));
        drive(&mut self.buzzer, false, "buzzer");
    }

    fn all_off(&mut self) {
        drive(&mut self.red, false, "red");
        drive(&mut self.blue, false, "blue");
        drive(&mut self.buzzer, false, "buzzer");
    }
}

// ───────────────────────────────────────────────────────────────
// Log-only indicator
// ───────────────────────────────────────────────────────────────

/// Stand-in when no GPIO is available. Keeps pulse and buzz timing so
/// the tick cadence matches a wired board.
pub struct LogIndicator<D> {
    delay: D,
}

impl<D: DelayNs> LogIndicator<D> {
    pub fn new(delay: D) -> Self {
        Self { delay }
    }
}

impl<D: DelayNs> IndicatorPort for LogIndicator<D> {
    fn pulse(&mut self, led: Led, duration: Duration) {
        self.delay.delay_ms(duration_ms(duration));
        log::trace!("indicator: pulse {:?} {:?}", led, duration);
    }

    fn solid_on(&mut self, led: Led) {
        debug!("indicator: {:?} on", led);
    }

    fn solid_off(&mut self, led: Led) {
        debug!("indicator: {:?} off", led);
    }

    fn buzz(&mut self, duration: Duration) {
        debug!("indicator: buzz {:?}", duration);
        self.delay.delay_ms(duration_ms(duration));
    }

    fn all_off(&mut self) {
        debug!("indicator: all off");
    }
}
