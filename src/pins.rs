//! GPIO and device-path assignments for the experiment board.
//!
//! Drivers take their pin numbers and paths from here. BCM numbering.

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// Red LED: experiment live (pulses while monitoring, solid on completion).
pub const RED_LED_GPIO: u32 = 18;
/// Blue LED: pulses during baseline search, solid while awaiting start.
pub const BLUE_LED_GPIO: u32 = 24;
/// Active buzzer, HIGH = sounding.
pub const BUZZER_GPIO: u32 = 22;

// ---------------------------------------------------------------------------
// One-wire bus (w1-gpio on BCM 4 by default)
// ---------------------------------------------------------------------------

/// Where the kernel lists one-wire slaves.
pub const W1_DEVICES_DIR: &str = "/sys/bus/w1/devices";
/// Family code of the DS18B20 thermometer.
pub const W1_FAMILY_PREFIX: &str = "28";
/// Per-device text file produced by `w1_therm`.
pub const W1_SLAVE_FILE: &str = "w1_slave";

// ---------------------------------------------------------------------------
// Sysfs GPIO
// ---------------------------------------------------------------------------

pub const SYSFS_GPIO_DIR: &str = "/sys/class/gpio";
