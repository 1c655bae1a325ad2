//! Thermotrack library.
//!
//! Exposes the experiment core (phase FSM, stability detector, service)
//! and the host adapters for integration testing and the binary.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod logging;
pub mod pins;
pub mod sensors;
pub mod stability;

pub use app::cancel::CancelToken;
pub use app::events::{AppEvent, RunOutcome, RunSummary};
pub use app::service::ExperimentService;
pub use config::ExperimentConfig;
pub use error::{Error, Result};
pub use fsm::Phase;
