//! Hardware drivers for the indicator outputs.

pub mod indicator;
pub mod sysfs_gpio;
