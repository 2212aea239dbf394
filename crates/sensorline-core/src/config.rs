use crate::channel::{FilterPolicy, Limits};

pub const BAUD_RATE: u32 = 2400;
pub const SAMPLE_PERIOD_MS: u32 = 2000; // 2000ms between sensor reads
pub const SENSOR_RETRY_MS: u32 = 1000;
pub const HISTORY_DEPTH: usize = 3;
pub const FIELD_WIDTH: usize = 4;

/// Sent once per failed sensor bring-up attempt
pub const SENSOR_MISSING: &str = "X";
pub const LINE_END: &str = "\r\n";

/// Hundredths of a degree Celsius (BME680 operating range)
pub const TEMPERATURE_LIMITS: Limits = Limits::new(-4000, 8500);
/// Hundredths of a percent relative humidity
pub const HUMIDITY_LIMITS: Limits = Limits::new(0, 10000);
/// Whole hPa
pub const PRESSURE_LIMITS: Limits = Limits::new(300, 1100);

/// StationConfig selects how each channel validates its samples and how often
/// the sensor is read.
/// temperature: Policy for the temperature channel
/// humidity: Policy for the humidity channel
/// pressure: Policy for the pressure channel
/// sample_period_ms: Milliseconds between sensor reads
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StationConfig {
    pub temperature: FilterPolicy,
    pub humidity: FilterPolicy,
    pub pressure: FilterPolicy,
    pub sample_period_ms: u32,
}

impl Default for StationConfig {
    fn default() -> Self {
        StationConfig {
            temperature: FilterPolicy::Reject, // Plain 20% band
            humidity: FilterPolicy::Reject,
            pressure: FilterPolicy::Reject,
            sample_period_ms: SAMPLE_PERIOD_MS,
        }
    }
}

impl StationConfig {
    /// Range-checked policy on every channel, using the default limits
    pub fn nudging() -> Self {
        StationConfig {
            temperature: FilterPolicy::Nudge(TEMPERATURE_LIMITS),
            humidity: FilterPolicy::Nudge(HUMIDITY_LIMITS),
            pressure: FilterPolicy::Nudge(PRESSURE_LIMITS),
            ..Default::default()
        }
    }
}
