//! Sensor subsystem.
//!
//! One driver today: the DS18B20 on the Linux one-wire bus. It
//! implements [`SensorPort`](crate::app::ports::SensorPort) directly.

pub mod w1_therm;

pub use w1_therm::{RetryPolicy, SysfsSource, W1ThermSensor, discover, parse_w1_slave};
