//! Linux sysfs GPIO output pin.
//!
//! Exports the line if needed, sets it as an output, and keeps the
//! `value` file open. Implements `embedded-hal`'s [`OutputPin`] so the
//! indicator driver stays hardware-agnostic.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use embedded_hal::digital::{self, ErrorKind, ErrorType, OutputPin};
use log::info;

/// Pin write failure, carrying the underlying I/O error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SysfsGpioError(pub io::ErrorKind);

impl digital::Error for SysfsGpioError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl From<io::Error> for SysfsGpioError {
    fn from(e: io::Error) -> Self {
        Self(e.kind())
    }
}

pub struct SysfsPin {
    number: u32,
    value: File,
}

impl SysfsPin {
    /// Export `number` under `gpio_dir` (normally `/sys/class/gpio`) and
    /// configure it as an output driven low.
    pub fn export(gpio_dir: &Path, number: u32) -> io::Result<Self> {
        let pin_dir = Self::pin_dir(gpio_dir, number);
        if !pin_dir.exists() {
            fs::write(gpio_dir.join("export"), number.to_string())?;
            info!("gpio{}: exported", number);
        }
        // "low" sets direction=out with an initial low level in one write.
        fs::write(pin_dir.join("direction"), "low")?;
        let value = OpenOptions::new().write(true).open(pin_dir.join("value"))?;
        Ok(Self { number, value })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    fn pin_dir(gpio_dir: &Path, number: u32) -> PathBuf {
        gpio_dir.join(format!("gpio{number}"))
    }

    fn write_level(&mut self, level: &[u8]) -> Result<(), SysfsGpioError> {
        self.value.seek(SeekFrom::Start(0))?;
        self.value.write_all(level)?;
        Ok(())
    }
}

impl ErrorType for SysfsPin {
    type Error = SysfsGpioError;
}

impl OutputPin for SysfsPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write_level(b"0")
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write_level(b"1")
    }
}
