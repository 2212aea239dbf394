#![no_std]
#![no_main]

use bsp::entry;
use defmt::*;
use defmt_rtt as _;
use embedded_hal::delay::DelayNs;
use panic_probe as _;

// Provide an alias for our BSP so we can switch targets quickly.
use rp_pico as bsp;

use bsp::hal::{
    clocks::{init_clocks_and_plls, Clock},
    fugit::RateExtU32,
    gpio::{FunctionI2C, Pin, PullUp},
    pac,
    watchdog::Watchdog,
    Sio, Timer, I2C,
};
use sensorline::clock::Millis;
use sensorline::sensors::{probe, Bme680Reader};
use sensorline_core::config::{StationConfig, BAUD_RATE, SENSOR_MISSING, SENSOR_RETRY_MS};
use sensorline_core::{BitTiming, SoftSerial, Station, TickOutcome};

#[entry]
fn main() -> ! {
    info!("sensorline starting");
    // Grab our singleton objects
    let mut pac = pac::Peripherals::take().unwrap();

    // Set up the watchdog driver - needed by the clock setup code
    let mut watchdog = Watchdog::new(pac.WATCHDOG);

    // The default is to generate a 125 MHz system clock
    let clocks = init_clocks_and_plls(
        bsp::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    let sio = Sio::new(pac.SIO);
    let pins = bsp::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);

    // TX on GP15, idles high from here on
    let tx = pins.gpio15.into_push_pull_output();
    let mut serial = SoftSerial::new(tx, timer, BitTiming::from_baud(BAUD_RATE));
    info!(
        "soft serial at {} baud, {}us per bit",
        BAUD_RATE,
        serial.timing().bit_micros()
    );

    // Sensor bus on GP4/GP5
    let sda: Pin<_, FunctionI2C, PullUp> = pins.gpio4.reconfigure();
    let scl: Pin<_, FunctionI2C, PullUp> = pins.gpio5.reconfigure();
    let mut i2c = I2C::i2c0(
        pac.I2C0,
        sda,
        scl,
        100.kHz(),
        &mut pac.RESETS,
        clocks.system_clock.freq(),
    );

    // No sensor, no reports: flag each failed attempt on the line and retry
    while let Err(e) = probe(&mut i2c) {
        warn!("BME680 not found: {}", e);
        serial.write_str(SENSOR_MISSING);
        timer.delay_ms(SENSOR_RETRY_MS);
    }

    let mut sensor = match Bme680Reader::init(i2c, timer) {
        Ok(sensor) => sensor,
        Err(e) => defmt::panic!("BME680 answered but would not configure: {}", e),
    };

    let clock = Millis::new(timer);
    let config = StationConfig::default();
    let mut station = Station::new(config);

    info!("sensorline ready: {}", config);

    loop {
        if let Some(outcome) = station.poll(clock.now_ms(), &mut sensor) {
            match outcome {
                TickOutcome::Sampled { raw, .. } if outcome.filtered() > 0 => {
                    debug!("filtered {} channel(s): {}", outcome.filtered(), outcome);
                    trace!("raw {}", raw);
                }
                TickOutcome::Sampled { raw, .. } => trace!("raw {}", raw),
                TickOutcome::SensorFailed(e) => warn!("sensor read failed: {}", e),
            }
        }

        station.report(&mut serial);
    }
}
