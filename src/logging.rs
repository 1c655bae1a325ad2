//! Log backend for the host binary.
//!
//! The library logs through the `log` facade. The binary installs a
//! `tracing-subscriber` fmt layer on stderr, which picks up `log`
//! records through its `tracing-log` bridge.
//!
//! Filter priority, highest first:
//!
//! 1. `THERMOTRACK_LOG` (e.g. `thermotrack=debug,warn`)
//! 2. `RUST_LOG`
//! 3. `-v` / `-vv` / `-q` on the command line
//! 4. `warn`

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

pub const LOG_ENV: &str = "THERMOTRACK_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    Trace,
}

impl Verbosity {
    /// `-v` is counted; `-q` loses to any `-v`.
    pub const fn from_flags(verbose: u8, quiet: bool) -> Self {
        match verbose {
            0 if quiet => Self::Quiet,
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Trace,
        }
    }

    pub const fn level(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::ERROR,
            Self::Normal => LevelFilter::WARN,
            Self::Verbose => LevelFilter::INFO,
            Self::Trace => LevelFilter::DEBUG,
        }
    }
}

/// Install the global subscriber. Fails if one is already set.
pub fn init(verbosity: Verbosity) -> anyhow::Result<()> {
    let use_ansi = std::io::IsTerminal::is_terminal(&std::io::stderr());
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(use_ansi)
        .with_target(verbosity == Verbosity::Trace);

    tracing_subscriber::registry()
        .with(build_env_filter(verbosity))
        .with(fmt_layer.with_timer(fmt::time::uptime()))
        .try_init()?;
    Ok(())
}

fn build_env_filter(verbosity: Verbosity) -> EnvFilter {
    // An unparsable THERMOTRACK_LOG falls through rather than failing.
    if let Some(filter) = std::env::var(LOG_ENV)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
    {
        return filter;
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::default().add_directive(verbosity.level().into())
}
