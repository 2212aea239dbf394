use bme680::{
    Bme680, FieldData, I2CAddress, IIRFilterSize, OversamplingSetting, PowerMode, SettingsBuilder,
};
use embedded_hal::i2c::I2c;
use rp_pico::hal::gpio::bank0::{Gpio4, Gpio5};
use rp_pico::hal::gpio::{FunctionI2C, Pin, PullUp};
use rp_pico::hal::{Timer, I2C};
use rp_pico::pac::I2C0;
use sensorline_core::{Readings, SensorError, SensorReader};

pub type SensorI2c = I2C<
    I2C0,
    (
        Pin<Gpio4, FunctionI2C, PullUp>,
        Pin<Gpio5, FunctionI2C, PullUp>,
    ),
>;

type Bme = Bme680<SensorI2c, Timer>;

/// BME680 on its secondary address (SDO high)
pub const BME680_ADDRESS: u8 = 0x77;
const CHIP_ID_REGISTER: u8 = 0xD0;
const BME680_CHIP_ID: u8 = 0x61;

/// Checks the chip ID without handing the bus to the driver
/// param i2c: Sensor bus
/// returns Ok if a BME680 answered
pub fn probe<I: I2c>(i2c: &mut I) -> Result<(), SensorError> {
    let mut id = [0u8];
    i2c.write_read(BME680_ADDRESS, &[CHIP_ID_REGISTER], &mut id)
        .map_err(|_| SensorError::Init)?;

    if id[0] == BME680_CHIP_ID {
        Ok(())
    } else {
        Err(SensorError::Init)
    }
}

/// BME680 in forced mode, one measurement per read
pub struct Bme680Reader {
    bme: Bme,
    delay: Timer,
}

impl Bme680Reader {
    /// Takes the bus and configures oversampling. Gas heating stays off.
    /// Only call after probe() has succeeded; the bus is lost on failure.
    pub fn init(i2c: SensorI2c, mut delay: Timer) -> Result<Self, SensorError> {
        let mut bme = Bme680::init(i2c, &mut delay, I2CAddress::Secondary)
            .map_err(|_| SensorError::Init)?;

        let settings = SettingsBuilder::new()
            .with_humidity_oversampling(OversamplingSetting::OS2x)
            .with_pressure_oversampling(OversamplingSetting::OS4x)
            .with_temperature_oversampling(OversamplingSetting::OS8x)
            .with_temperature_filter(IIRFilterSize::Size3)
            .with_run_gas(false)
            .build();

        bme.set_sensor_settings(&mut delay, settings)
            .map_err(|_| SensorError::Init)?;

        Ok(Self { bme, delay })
    }
}

impl SensorReader for Bme680Reader {
    fn read(&mut self) -> Result<Readings, SensorError> {
        self.bme
            .set_sensor_mode(&mut self.delay, PowerMode::ForcedMode)
            .map_err(|_| SensorError::Mode)?;

        let (data, _condition) = self
            .bme
            .get_sensor_data(&mut self.delay)
            .map_err(|_| SensorError::Read)?;

        Ok(to_readings(&data))
    }
}

/// Hundredths of a degree, hundredths of a percent, whole hPa.
/// Casts truncate toward zero.
pub fn to_readings(data: &FieldData) -> Readings {
    Readings::new(
        (data.temperature_celsius() * 100.) as i32,
        (data.humidity_percent() * 100.) as i32,
        data.pressure_hpa() as i32,
    )
}
