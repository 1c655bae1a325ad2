//! Thermotrack main entry point
//!
//! Hexagonal layout: the binary builds the adapters, hands them to the
//! pure experiment core and waits for it to finish.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  HardwareAdapter      TsvRecordSink     ConsoleEventSink     │
//! │  (W1 sensor + pins)   (RecordSink)      LogEventSink         │
//! │  StdClock (TimePort)                    (EventSink)          │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │       ExperimentService (pure logic)                 │    │
//! │  │  Phase FSM · StabilityDetector                       │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{info, warn};

use thermotrack::adapters::console::{ConsoleEventSink, write_settings};
use thermotrack::adapters::hardware::HardwareAdapter;
use thermotrack::adapters::log_sink::LogEventSink;
use thermotrack::adapters::time::{StdClock, StdDelay};
use thermotrack::adapters::tsv_sink::TsvRecordSink;
use thermotrack::app::ports::{EventSink, IndicatorPort, RecordSink};
use thermotrack::drivers::indicator::{LogIndicator, PinIndicator};
use thermotrack::drivers::sysfs_gpio::SysfsPin;
use thermotrack::logging::{self, Verbosity};
use thermotrack::pins::{BLUE_LED_GPIO, BUZZER_GPIO, RED_LED_GPIO, SYSFS_GPIO_DIR, W1_DEVICES_DIR};
use thermotrack::sensors::{RetryPolicy, SysfsSource, W1ThermSensor, discover};
use thermotrack::{CancelToken, ExperimentConfig, ExperimentService, RunOutcome, RunSummary};

type Sensor = W1ThermSensor<SysfsSource, StdDelay>;

#[derive(Parser, Debug)]
#[command(name = "thermotrack")]
#[command(about = "Track a temperature experiment: settle a baseline, detect the start, wait for the end")]
#[command(version, allow_negative_numbers = true)]
struct Cli {
    /// Readings that must agree to set the baseline
    #[arg(short = 'w', long)]
    base_window: Option<usize>,

    /// Maximal spread (°C) across the baseline window
    #[arg(short = 'B', long)]
    base_range: Option<f64>,

    /// JSON config file, applied before the command-line overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// Explicit w1_slave file (default: first 28* device)
    #[arg(long)]
    device: Option<PathBuf>,

    /// One-wire device directory searched when --device is absent
    #[arg(long, default_value = W1_DEVICES_DIR)]
    w1_dir: PathBuf,

    /// Sysfs GPIO directory
    #[arg(long, default_value = SYSFS_GPIO_DIR)]
    gpio_dir: PathBuf,

    /// Log indicator actions instead of driving GPIO
    #[arg(long)]
    no_gpio: bool,

    /// Sensor readiness attempts per read (0 = retry forever)
    #[arg(long)]
    max_retries: Option<u32>,

    /// Stop after this many seconds
    #[arg(long)]
    max_runtime: Option<u64>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Errors only
    #[arg(short, long)]
    quiet: bool,

    /// Output file for the recorded samples (- for stdout)
    outfile: String,

    /// Signed difference from baseline (°C) that starts the experiment
    start_temp_diff: f64,

    /// Signed difference from baseline (°C) that ends the experiment
    end_temp_diff: f64,
}

impl Cli {
    /// Defaults → optional JSON file → command line.
    fn experiment_config(&self) -> Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => ExperimentConfig::default(),
        };
        if let Some(w) = self.base_window {
            config.base_window = w;
        }
        if let Some(range) = self.base_range {
            config.base_range = range;
        }
        if let Some(n) = self.max_retries {
            config.sensor_max_attempts = (n > 0).then_some(n);
        }
        if let Some(secs) = self.max_runtime {
            config.max_runtime_secs = Some(secs);
        }
        config.start_temp_diff = self.start_temp_diff;
        config.end_temp_diff = self.end_temp_diff;
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(Verbosity::from_flags(cli.verbose, cli.quiet))?;

    let config = cli.experiment_config()?;
    let to_stdout = cli.outfile == "-";

    // Records take stdout when OUTFILE is `-`; the console moves to stderr.
    let (record_out, mut console_out): (Box<dyn Write>, Box<dyn Write>) = if to_stdout {
        (Box::new(io::stdout()), Box::new(io::stderr()))
    } else {
        let file = File::create(&cli.outfile)
            .with_context(|| format!("creating {}", cli.outfile))?;
        (Box::new(BufWriter::new(file)), Box::new(io::stdout()))
    };
    write_settings(&mut console_out, &config, &cli.outfile)?;

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || handler_token.cancel()).context("installing Ctrl-C handler")?;

    let sensor = open_sensor(&cli, &config)?.with_cancel(cancel.clone());

    let mut service = ExperimentService::new(config.clone())?.with_cancel_token(cancel.clone());
    let mut clock = StdClock::with_cancel(cancel);
    let mut records = TsvRecordSink::new(record_out);
    let mut events = (
        ConsoleEventSink::new(console_out, config.dots_per_line),
        LogEventSink::new(),
    );

    let summary = if cli.no_gpio {
        info!("GPIO disabled, indicators are logged only");
        let indicator = LogIndicator::new(StdDelay);
        run_experiment(&mut service, sensor, indicator, &mut clock, &mut records, &mut events)?
    } else {
        let pin = |number| {
            SysfsPin::export(&cli.gpio_dir, number)
                .with_context(|| format!("exporting gpio{number} (use --no-gpio to run without)"))
        };
        let indicator = PinIndicator::new(
            pin(RED_LED_GPIO)?,
            pin(BLUE_LED_GPIO)?,
            pin(BUZZER_GPIO)?,
            StdDelay,
        );
        run_experiment(&mut service, sensor, indicator, &mut clock, &mut records, &mut events)?
    };

    Ok(match summary.outcome {
        RunOutcome::Completed => ExitCode::SUCCESS,
        RunOutcome::TimedOut => ExitCode::from(2),
        RunOutcome::Cancelled => ExitCode::from(130),
    })
}

fn open_sensor(cli: &Cli, config: &ExperimentConfig) -> Result<Sensor> {
    let path = match &cli.device {
        Some(path) => path.clone(),
        None => discover(&cli.w1_dir).context("locating the thermometer")?,
    };
    let source = SysfsSource::open(&path)
        .with_context(|| format!("opening sensor {}", path.display()))?;
    info!("sensor: {}", path.display());
    Ok(W1ThermSensor::new(source, StdDelay, RetryPolicy::from_config(config)))
}

fn run_experiment(
    service: &mut ExperimentService,
    sensor: Sensor,
    indicator: impl IndicatorPort,
    clock: &mut StdClock,
    records: &mut impl RecordSink,
    events: &mut impl EventSink,
) -> Result<RunSummary> {
    let mut hw = HardwareAdapter::new(sensor, indicator);
    let summary = service
        .run(&mut hw, clock, records, events)
        .context("experiment aborted")?;
    if summary.outcome != RunOutcome::Completed {
        warn!("experiment ended early: {:?}", summary.outcome);
    }
    Ok(summary)
}
