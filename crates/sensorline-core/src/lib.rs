#![cfg_attr(not(test), no_std)]

//! # sensorline-core
//! ## Hardware-independent half of the sensorline weather beacon
//!
//! Features:
//! - Bit-banged asynchronous serial transmitter (8N1, LSB first)
//! - Three-slot smoothing with outlier rejection per measurement channel
//! - Station context that paces sampling and renders the report line
//!
//! Nothing in here touches a register. Pins and delays come in through
//! `embedded-hal` traits so the whole crate runs under `cargo test` on the host.

pub mod channel;
pub mod config;
pub mod sensor;
pub mod soft_serial;
pub mod station;
pub mod timer;

pub use channel::{FilterPolicy, Limits, SmoothedChannel, Verdict};
pub use sensor::{Readings, SensorError, SensorReader};
pub use soft_serial::{BitTiming, SoftSerial};
pub use station::{Station, TickOutcome};
