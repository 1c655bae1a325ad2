//! Application layer — hexagonal architecture core.
//!
//! - [`ports`]   — trait boundaries (SensorPort, IndicatorPort, RecordSink, EventSink, TimePort)
//! - [`events`]  — outbound domain events and the run summary
//! - [`cancel`]  — cooperative cancellation token
//! - [`service`] — the ExperimentService that drives the FSM

pub mod cancel;
pub mod events;
pub mod ports;
pub mod service;
