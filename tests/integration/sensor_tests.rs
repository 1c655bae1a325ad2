//! Integration tests for the w1 sensor stack against a fake sysfs tree.

use std::fs;
use std::path::{Path, PathBuf};

use embedded_hal::delay::DelayNs;

use thermotrack::adapters::hardware::HardwareAdapter;
use thermotrack::app::ports::SensorPort;
use thermotrack::drivers::indicator::LogIndicator;
use thermotrack::error::{Error, SensorError};
use thermotrack::sensors::{RetryPolicy, SysfsSource, W1ThermSensor, discover};
use thermotrack::{CancelToken, ExperimentConfig, ExperimentService, Phase, RunOutcome};

use crate::mock_hw::{EventLog, FakeClock, MemoryRecords, NoDelay};

/// A scratch `devices/` directory, removed on drop.
struct FakeBus {
    root: PathBuf,
}

impl FakeBus {
    fn new(tag: &str) -> Self {
        let root = std::env::temp_dir().join(format!(
            "thermotrack-it-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    fn add_device(&self, name: &str, w1_slave: &str) -> PathBuf {
        let dir = self.root.join(name);
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("w1_slave");
        fs::write(&file, w1_slave).unwrap();
        file
    }

    fn path(&self) -> &Path {
        &self.root
    }
}

impl Drop for FakeBus {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn w1_text(ready: bool, millidegrees: i64) -> String {
    let status = if ready { "YES" } else { "NO" };
    format!(
        "50 01 4b 46 7f ff 0c 10 1c : crc=1c {status}\n\
         50 01 4b 46 7f ff 0c 10 1c t={millidegrees}\n"
    )
}

#[test]
fn discovery_skips_non_thermometers() {
    let bus = FakeBus::new("discover");
    bus.add_device("w1_bus_master1", "");
    bus.add_device("10-000802b4e7a1", &w1_text(true, 1000));
    let expected = bus.add_device("28-00000a1b2c3d", &w1_text(true, 21500));

    assert_eq!(discover(bus.path()).unwrap(), expected);
}

#[test]
fn sensor_reads_the_discovered_file() {
    let bus = FakeBus::new("read");
    bus.add_device("28-0316a2791aff", &w1_text(true, -1250));

    let path = discover(bus.path()).unwrap();
    let mut sensor = W1ThermSensor::new(SysfsSource::open(&path).unwrap(), NoDelay, RetryPolicy::default());
    assert_eq!(sensor.read(), Ok(Some(-1.25)));

    fs::write(&path, w1_text(true, 0)).unwrap();
    assert_eq!(sensor.read(), Ok(Some(0.0)));
}

#[test]
fn busy_device_exhausts_the_retry_budget() {
    let bus = FakeBus::new("busy");
    let path = bus.add_device("28-0316a2791aff", &w1_text(false, 20000));
    let retry = RetryPolicy {
        delay_ms: 200,
        max_attempts: Some(5),
    };
    let mut sensor = W1ThermSensor::new(SysfsSource::open(&path).unwrap(), NoDelay, retry);

    assert_eq!(sensor.read(), Err(SensorError::Unavailable { attempts: 5 }));
    assert_eq!(sensor.total_retries(), 4);
}

/// Stands in for Ctrl-C arriving while the sensor waits to re-check.
struct InterruptingDelay(CancelToken);

impl DelayNs for InterruptingDelay {
    fn delay_ns(&mut self, _ns: u32) {
        self.0.cancel();
    }
}

#[test]
fn busy_device_with_cancel_set_returns_at_once() {
    let bus = FakeBus::new("busy-cancel");
    let path = bus.add_device("28-0316a2791aff", &w1_text(false, 20000));
    let retry = RetryPolicy {
        delay_ms: 200,
        max_attempts: None,
    };
    let token = CancelToken::new();
    token.cancel();
    let mut sensor =
        W1ThermSensor::new(SysfsSource::open(&path).unwrap(), NoDelay, retry).with_cancel(token);

    assert_eq!(sensor.read(), Err(SensorError::Cancelled));
    assert_eq!(sensor.total_retries(), 0);
}

#[test]
fn interrupt_during_sensor_retry_cancels_the_run() {
    let bus = FakeBus::new("busy-run");
    let path = bus.add_device("28-0316a2791aff", &w1_text(false, 20000));
    let retry = RetryPolicy {
        delay_ms: 200,
        max_attempts: None,
    };
    let cancel = CancelToken::new();
    let sensor = W1ThermSensor::new(
        SysfsSource::open(&path).unwrap(),
        InterruptingDelay(cancel.clone()),
        retry,
    )
    .with_cancel(cancel.clone());
    let mut hw = HardwareAdapter::new(sensor, LogIndicator::new(NoDelay));
    let mut service = ExperimentService::new(ExperimentConfig::default())
        .unwrap()
        .with_cancel_token(cancel);
    let mut records = MemoryRecords::new();

    let summary = service
        .run(&mut hw, &mut FakeClock::new(), &mut records, &mut EventLog::new())
        .unwrap();

    assert_eq!(summary.outcome, RunOutcome::Cancelled);
    assert_eq!(summary.final_phase, Phase::BaselineSearch);
    assert!(records.rows.is_empty());
    assert_eq!(hw.sensor().total_retries(), 1);
}

#[test]
fn steady_sensor_finds_baseline_then_times_out() {
    let bus = FakeBus::new("run");
    let path = bus.add_device("28-0316a2791aff", &w1_text(true, 21437));

    let sensor = W1ThermSensor::new(SysfsSource::open(&path).unwrap(), NoDelay, RetryPolicy::default());
    let mut hw = HardwareAdapter::new(sensor, LogIndicator::new(NoDelay));
    let cfg = ExperimentConfig {
        max_runtime_secs: Some(10),
        ..ExperimentConfig::default()
    };
    let mut service = ExperimentService::new(cfg).unwrap();
    let mut records = MemoryRecords::new();

    let summary = service
        .run(&mut hw, &mut FakeClock::new(), &mut records, &mut EventLog::new())
        .unwrap();

    assert_eq!(summary.outcome, RunOutcome::TimedOut);
    assert_eq!(summary.final_phase, Phase::AwaitStart);
    let baseline = summary.baseline_c.unwrap();
    assert!((baseline - 21.437).abs() < 1e-9);
    assert!(records.temperatures().iter().all(|&t| t == 21.437));
    assert_eq!(hw.sensor().total_reads(), summary.samples);
}

#[test]
fn vanished_device_aborts_the_run() {
    let bus = FakeBus::new("vanish");
    let path = bus.add_device("28-0316a2791aff", &w1_text(true, 20000));
    let retry = RetryPolicy {
        delay_ms: 1,
        max_attempts: Some(3),
    };
    let sensor = W1ThermSensor::new(SysfsSource::open(&path).unwrap(), NoDelay, retry);
    fs::remove_file(&path).unwrap();

    let mut hw = HardwareAdapter::new(sensor, LogIndicator::new(NoDelay));
    let mut service = ExperimentService::new(ExperimentConfig::default()).unwrap();
    let err = service
        .run(&mut hw, &mut FakeClock::new(), &mut MemoryRecords::new(), &mut EventLog::new())
        .unwrap_err();

    assert_eq!(err, Error::Sensor(SensorError::Unavailable { attempts: 3 }));
}
