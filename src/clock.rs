use rp_pico::hal::Timer;

/// Millisecond view of the free-running 1MHz RP2040 timer.
/// Wraps after ~49 days; consumers use wrapping arithmetic.
#[derive(Clone, Copy)]
pub struct Millis {
    timer: Timer,
}

impl Millis {
    pub fn new(timer: Timer) -> Self {
        Self { timer }
    }

    pub fn now_ms(&self) -> u32 {
        (self.timer.get_counter().ticks() / 1_000) as u32
    }
}
