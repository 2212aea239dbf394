//! Driver context: three smoothed channels, sampling pace, report line.
//!
//! One `Station` lives for the whole run. The main loop hands it the current
//! time and the sensor on every pass; the station decides whether a sample is
//! due and owns every bit of state the loop needs between passes.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::channel::{SmoothedChannel, Verdict};
use crate::config::{StationConfig, FIELD_WIDTH, LINE_END};
use crate::sensor::{Readings, SensorError, SensorReader};
use crate::soft_serial::SoftSerial;
use crate::timer::Interval;

/// What happened on a sampling tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    Sampled {
        raw: Readings,
        temperature: Verdict,
        humidity: Verdict,
        pressure: Verdict,
    },
    /// The sensor failed; no channel was touched
    SensorFailed(SensorError),
}

impl TickOutcome {
    /// Number of channels that did not store the raw sample as-is
    pub fn filtered(&self) -> usize {
        match self {
            TickOutcome::Sampled {
                temperature,
                humidity,
                pressure,
                ..
            } => [temperature, humidity, pressure]
                .iter()
                .filter(|v| ***v != Verdict::Accepted)
                .count(),
            TickOutcome::SensorFailed(_) => 0,
        }
    }
}

pub struct Station {
    temperature: SmoothedChannel,
    humidity: SmoothedChannel,
    pressure: SmoothedChannel,
    interval: Interval,
}

impl Default for Station {
    fn default() -> Self {
        Self::new(StationConfig::default())
    }
}

impl Station {
    pub fn new(config: StationConfig) -> Self {
        Self {
            temperature: SmoothedChannel::new(config.temperature),
            humidity: SmoothedChannel::new(config.humidity),
            pressure: SmoothedChannel::new(config.pressure),
            interval: Interval::new(config.sample_period_ms),
        }
    }

    pub fn temperature(&self) -> &SmoothedChannel {
        &self.temperature
    }

    pub fn humidity(&self) -> &SmoothedChannel {
        &self.humidity
    }

    pub fn pressure(&self) -> &SmoothedChannel {
        &self.pressure
    }

    /// Samples the sensor if a full period has passed since the last attempt.
    /// A failed read still restarts the period.
    pub fn poll<S: SensorReader>(&mut self, now_ms: u32, sensor: &mut S) -> Option<TickOutcome> {
        if !self.interval.poll(now_ms) {
            return None;
        }

        Some(match sensor.read() {
            Ok(raw) => self.push(raw),
            Err(e) => TickOutcome::SensorFailed(e),
        })
    }

    /// Feeds one set of readings through the channels
    pub fn push(&mut self, raw: Readings) -> TickOutcome {
        TickOutcome::Sampled {
            raw,
            temperature: self.temperature.offer(raw.temperature),
            humidity: self.humidity.offer(raw.humidity),
            pressure: self.pressure.offer(raw.pressure),
        }
    }

    pub fn averages(&self) -> Readings {
        Readings::new(
            self.temperature.average(),
            self.humidity.average(),
            self.pressure.average(),
        )
    }

    /// Writes "TTTTHHHHPPPP\r\n" with each average zero-padded to four digits
    pub fn report<P, D>(&self, serial: &mut SoftSerial<P, D>)
    where
        P: OutputPin<Error = Infallible>,
        D: DelayNs,
    {
        let averages = self.averages();
        serial.write_int_padded(averages.temperature, FIELD_WIDTH);
        serial.write_int_padded(averages.humidity, FIELD_WIDTH);
        serial.write_int_padded(averages.pressure, FIELD_WIDTH);
        serial.write_str(LINE_END);
    }
}
