//! DS18B20 one-wire thermometer via the Linux `w1_therm` driver.
//!
//! The driver exposes a `w1_slave` text file per device:
//!
//! ```text
//! 72 01 4b 46 7f ff 0e 10 57 : crc=57 YES
//! 72 01 4b 46 7f ff 0e 10 57 t=23125
//! ```
//!
//! The first line ends in `YES` once the CRC checks out; the second
//! carries the temperature in integer millidegrees Celsius.
//!
//! ## Dual-source design
//!
//! On hardware: reads the sysfs file through [`SysfsSource`].
//! On host/test: any [`RawSource`] can feed scripted text.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use embedded_hal::delay::DelayNs;
use log::{debug, error, warn};

use crate::app::cancel::CancelToken;
use crate::app::ports::SensorPort;
use crate::config::ExperimentConfig;
use crate::error::SensorError;
use crate::pins::{W1_FAMILY_PREFIX, W1_SLAVE_FILE};

const READY_MARKER: &str = "YES";
const VALUE_MARKER: &str = "t=";
const MILLIDEGREES_PER_DEGREE: f64 = 1000.0;

// ---------------------------------------------------------------------------
// Raw source
// ---------------------------------------------------------------------------

/// Whole-file text reads from the device.
pub trait RawSource {
    fn read_raw(&mut self) -> io::Result<String>;
}

/// The `w1_slave` file of one sensor.
pub struct SysfsSource {
    path: PathBuf,
}

impl SysfsSource {
    /// Fails if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        fs::metadata(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RawSource for SysfsSource {
    fn read_raw(&mut self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }
}

/// Find the first thermometer (family `28`) under `devices_dir` and
/// return the path of its `w1_slave` file.
pub fn discover(devices_dir: &Path) -> io::Result<PathBuf> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(devices_dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(W1_FAMILY_PREFIX))
        })
        .map(|entry| entry.path())
        .collect();
    candidates.sort();
    candidates
        .into_iter()
        .next()
        .map(|dir| dir.join(W1_SLAVE_FILE))
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!(
                    "no {}* device under {} (are w1-gpio and w1-therm loaded?)",
                    W1_FAMILY_PREFIX,
                    devices_dir.display()
                ),
            )
        })
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse one `w1_slave` snapshot.
///
/// * `Err(NotReady)` — first line missing or not ending in `YES`.
/// * `Ok(None)` — ready, but no usable `t=` value.
/// * `Ok(Some(c))` — degrees Celsius.
pub fn parse_w1_slave(text: &str) -> Result<Option<f64>, SensorError> {
    let mut lines = text.lines();
    let status = lines.next().ok_or(SensorError::NotReady)?;
    if !status.trim().ends_with(READY_MARKER) {
        return Err(SensorError::NotReady);
    }

    let Some(data) = lines.next() else {
        return Ok(None);
    };
    let Some(pos) = data.find(VALUE_MARKER) else {
        return Ok(None);
    };
    let raw = data[pos + VALUE_MARKER.len()..].trim();
    match raw.parse::<i64>() {
        Ok(milli) => Ok(Some(milli as f64 / MILLIDEGREES_PER_DEGREE)),
        Err(_) => {
            warn!("w1: unparsable temperature field {:?}", raw);
            Ok(None)
        }
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// How long to keep re-checking a device that is not ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay_ms: u32,
    /// `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    pub fn from_config(config: &ExperimentConfig) -> Self {
        Self {
            delay_ms: config.sensor_retry_delay_ms.min(u64::from(u32::MAX)) as u32,
            max_attempts: config.sensor_max_attempts,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ExperimentConfig::default())
    }
}

pub struct W1ThermSensor<S, D> {
    source: S,
    delay: D,
    retry: RetryPolicy,
    cancel: Option<CancelToken>,
    total_reads: u64,
    total_retries: u64,
}

impl<S: RawSource, D: DelayNs> W1ThermSensor<S, D> {
    pub fn new(source: S, delay: D, retry: RetryPolicy) -> Self {
        Self {
            source,
            delay,
            retry,
            cancel: None,
            total_reads: 0,
            total_retries: 0,
        }
    }

    /// Abandon retry waits once `cancel` fires.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    pub fn total_reads(&self) -> u64 {
        self.total_reads
    }

    /// Re-checks performed across all reads.
    pub fn total_retries(&self) -> u64 {
        self.total_retries
    }

    fn read_once(&mut self) -> Result<Option<f64>, SensorError> {
        match self.source.read_raw() {
            Ok(text) => parse_w1_slave(&text),
            Err(e) => Err(SensorError::Io(e.kind())),
        }
    }
}

impl<S: RawSource, D: DelayNs> SensorPort for W1ThermSensor<S, D> {
    fn read(&mut self) -> Result<Option<f64>, SensorError> {
        self.total_reads = self.total_reads.saturating_add(1);
        let mut attempts: u32 = 0;
        loop {
            attempts = attempts.saturating_add(1);
            let err = match self.read_once() {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };
            if self.retry.max_attempts.is_some_and(|max| attempts >= max) {
                error!("w1: giving up after {} attempts, last error: {}", attempts, err);
                return Err(SensorError::Unavailable { attempts });
            }
            debug!(
                "w1: {} (attempt {}), re-checking in {} ms",
                err, attempts, self.retry.delay_ms
            );
            if self.cancelled() {
                debug!("w1: cancelled after {} attempts", attempts);
                return Err(SensorError::Cancelled);
            }
            self.total_retries = self.total_retries.saturating_add(1);
            self.delay.delay_ms(self.retry.delay_ms);
            if self.cancelled() {
                return Err(SensorError::Cancelled);
            }
        }
    }
}
