//! Software serial transmitter
//!
//! Bit-bangs 8N1 frames on a single GPIO: one start bit (low), eight data
//! bits LSB first, one stop bit (high). The line idles high. Bit timing comes
//! only from the injected busy-wait delay, so each frame is sent inside a
//! critical section; an interrupt landing mid-frame would stretch a bit and
//! corrupt the byte with no way to notice.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use heapless::String;
use ufmt::{uWrite, uwrite};

/// Start + 8 data + stop
pub const FRAME_BITS: u32 = 10;

/// Longest decimal rendering of an i32: "-2147483648"
const INT_DIGITS: usize = 11;

/// How long each bit holds the line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitTiming {
    bit_us: u32,
}

impl BitTiming {
    /// Bit period rounded to the nearest microsecond; 2400 baud gives 417us
    pub const fn from_baud(baud: u32) -> Self {
        assert!(baud > 0, "baud rate must be non-zero");
        Self {
            bit_us: (1_000_000 + baud / 2) / baud,
        }
    }

    pub const fn from_micros(bit_us: u32) -> Self {
        Self { bit_us }
    }

    pub const fn bit_micros(&self) -> u32 {
        self.bit_us
    }

    /// Time one byte occupies the line
    pub const fn frame_micros(&self) -> u32 {
        self.bit_us.saturating_mul(FRAME_BITS)
    }
}

/// Transmit-only serial line on a push-pull output pin.
///
/// The pin must be exclusively owned. Writes block for `10 * bit period` per
/// byte and are not reentrant.
pub struct SoftSerial<P, D> {
    pin: P,
    delay: D,
    timing: BitTiming,
}

impl<P, D> SoftSerial<P, D>
where
    P: OutputPin<Error = Infallible>,
    D: DelayNs,
{
    /// Takes the pin and parks the line at idle (mark)
    pub fn new(pin: P, delay: D, timing: BitTiming) -> Self {
        let mut serial = Self { pin, delay, timing };
        serial.drive(PinState::High);
        serial
    }

    pub fn timing(&self) -> BitTiming {
        self.timing
    }

    /// Sends one 8N1 frame with interrupts masked
    pub fn write_byte(&mut self, byte: u8) {
        critical_section::with(|_| {
            self.hold(PinState::Low);
            for bit in 0..8 {
                self.hold(PinState::from(byte & (1 << bit) != 0));
            }
            self.hold(PinState::High);
        });
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.write_byte(byte);
        }
    }

    pub fn write_str(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }

    /// Sends `value` in decimal, left-padded with '0' to at least `width`
    /// characters. Longer numbers are sent whole. A minus sign counts towards
    /// the width and the padding goes in front of it, so -5 at width 4 is
    /// "00-5".
    pub fn write_int_padded(&mut self, value: i32, width: usize) {
        let mut digits: String<INT_DIGITS> = String::new();
        // INT_DIGITS fits every i32
        uwrite!(digits, "{}", value).unwrap();

        for _ in digits.len()..width {
            self.write_byte(b'0');
        }
        self.write_str(&digits);
    }

    fn hold(&mut self, level: PinState) {
        self.drive(level);
        self.delay.delay_us(self.timing.bit_us);
    }

    fn drive(&mut self, level: PinState) {
        match self.pin.set_state(level) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }
}

impl<P, D> uWrite for SoftSerial<P, D>
where
    P: OutputPin<Error = Infallible>,
    D: DelayNs,
{
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        SoftSerial::write_str(self, s);
        Ok(())
    }

    fn write_char(&mut self, c: char) -> Result<(), Self::Error> {
        let mut buf = [0u8; 4];
        SoftSerial::write_str(self, c.encode_utf8(&mut buf));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Event {
        Level(bool),
        Wait(u32),
    }

    type Trace = Rc<RefCell<Vec<Event>>>;

    struct RecordingPin(Trace);

    impl embedded_hal::digital::ErrorType for RecordingPin {
        type Error = Infallible;
    }

    impl OutputPin for RecordingPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.0.borrow_mut().push(Event::Level(false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.0.borrow_mut().push(Event::Level(true));
            Ok(())
        }
    }

    struct RecordingDelay(Trace);

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.0.borrow_mut().push(Event::Wait(ns / 1_000));
        }

        fn delay_us(&mut self, us: u32) {
            self.0.borrow_mut().push(Event::Wait(us));
        }
    }

    fn line(timing: BitTiming) -> (SoftSerial<RecordingPin, RecordingDelay>, Trace) {
        let trace = Trace::default();
        let serial = SoftSerial::new(
            RecordingPin(trace.clone()),
            RecordingDelay(trace.clone()),
            timing,
        );
        (serial, trace)
    }

    /// Pairs each level change with the wait that follows it
    fn segments(trace: &Trace) -> Vec<(bool, u32)> {
        let events = trace.borrow();
        let mut out = Vec::new();
        let mut level = None;
        for event in events.iter() {
            match *event {
                Event::Level(high) => level = Some(high),
                Event::Wait(us) => out.push((level.expect("wait before any level"), us)),
            }
        }
        out
    }

    fn decode(segments: &[(bool, u32)]) -> Vec<u8> {
        assert_eq!(segments.len() % 10, 0, "partial frame on the line");
        segments
            .chunks(10)
            .map(|frame| {
                assert!(!frame[0].0, "missing start bit");
                assert!(frame[9].0, "missing stop bit");
                frame[1..9]
                    .iter()
                    .enumerate()
                    .fold(0u8, |acc, (i, &(high, _))| acc | ((high as u8) << i))
            })
            .collect()
    }

    fn sent(trace: &Trace) -> Vec<u8> {
        decode(&segments(trace))
    }

    #[test]
    fn bit_period_from_baud() {
        assert_eq!(BitTiming::from_baud(2400).bit_micros(), 417);
        assert_eq!(BitTiming::from_baud(9600).bit_micros(), 104);
        assert_eq!(BitTiming::from_baud(2400).frame_micros(), 4170);
    }

    #[test]
    fn init_idles_high_without_waiting() {
        let (_serial, trace) = line(BitTiming::from_baud(2400));
        assert_eq!(*trace.borrow(), vec![Event::Level(true)]);
    }

    #[test]
    fn frame_is_start_lsb_first_stop() {
        let (mut serial, trace) = line(BitTiming::from_micros(417));
        serial.write_byte(0b0100_1011);

        let expected = vec![
            (false, 417), // start
            (true, 417),
            (true, 417),
            (false, 417),
            (true, 417),
            (false, 417),
            (false, 417),
            (true, 417),
            (false, 417),
            (true, 417), // stop
        ];
        assert_eq!(segments(&trace), expected);
    }

    #[test]
    fn frame_takes_ten_bit_periods() {
        let timing = BitTiming::from_baud(2400);
        for byte in [0x00, 0xFF, 0x55, b'\n'] {
            let (mut serial, trace) = line(timing);
            serial.write_byte(byte);
            let total: u32 = segments(&trace).iter().map(|&(_, us)| us).sum();
            assert_eq!(total, timing.frame_micros());
        }
    }

    #[test]
    fn line_ends_idle() {
        let (mut serial, trace) = line(BitTiming::from_baud(2400));
        serial.write_byte(0x00);
        assert_eq!(trace.borrow().last(), Some(&Event::Wait(417)));
        assert_eq!(segments(&trace).last(), Some(&(true, 417)));
    }

    #[test]
    fn strings_go_out_in_order() {
        let (mut serial, trace) = line(BitTiming::from_baud(2400));
        serial.write_str("OK\r\n");
        assert_eq!(sent(&trace), b"OK\r\n");
    }

    #[test]
    fn padded_integers() {
        let cases: [(i32, usize, &[u8]); 7] = [
            (7, 4, b"0007"),
            (12345, 4, b"12345"),
            (0, 4, b"0000"),
            (1013, 4, b"1013"),
            (-5, 4, b"00-5"),
            (-1234, 4, b"-1234"),
            (42, 0, b"42"),
        ];
        for (value, width, expected) in cases {
            let (mut serial, trace) = line(BitTiming::from_baud(2400));
            serial.write_int_padded(value, width);
            assert_eq!(sent(&trace), expected, "{value} at width {width}");
        }
    }

    #[test]
    fn extreme_integers_fit() {
        let (mut serial, trace) = line(BitTiming::from_baud(2400));
        serial.write_int_padded(i32::MIN, 4);
        assert_eq!(sent(&trace), b"-2147483648");
    }

    #[test]
    fn ufmt_writes_through_the_line() {
        let (mut serial, trace) = line(BitTiming::from_baud(2400));
        uwrite!(serial, "T={}", 21).unwrap();
        assert_eq!(sent(&trace), b"T=21");
    }

    #[test]
    fn oversized_bit_period_saturates_frame_time() {
        let timing = BitTiming::from_micros(u32::MAX / 4);
        assert_eq!(timing.frame_micros(), u32::MAX);
        assert_eq!(BitTiming::from_micros(417).frame_micros(), 4170);
    }
}
