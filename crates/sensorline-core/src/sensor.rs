use thiserror_no_std::Error;

/// One set of fixed-point readings.
/// temperature: Hundredths of a degree Celsius
/// humidity: Hundredths of a percent relative humidity
/// pressure: Whole hPa
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Readings {
    pub temperature: i32,
    pub humidity: i32,
    pub pressure: i32,
}

impl Readings {
    pub const fn new(temperature: i32, humidity: i32, pressure: i32) -> Self {
        Self {
            temperature,
            humidity,
            pressure,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    #[error("sensor did not answer during bring-up")]
    Init,
    #[error("failed to switch sensor into forced mode")]
    Mode,
    #[error("sensor read failed")]
    Read,
}

/// Source of raw measurements, read once per sampling tick
pub trait SensorReader {
    fn read(&mut self) -> Result<Readings, SensorError>;
}

impl<S: SensorReader + ?Sized> SensorReader for &mut S {
    fn read(&mut self) -> Result<Readings, SensorError> {
        (**self).read()
    }
}
