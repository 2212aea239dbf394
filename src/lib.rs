#![no_std]

//! # sensorline
//! ## Weather beacon on a bit-banged serial line
//!
//! Board support for the RP2040 build:
//! - BME680 adapter producing fixed-point readings
//! - Millisecond clock for sample pacing
//!
//! The transmitter, smoothing and report format live in `sensorline-core`.

pub mod clock;
pub mod sensors;
