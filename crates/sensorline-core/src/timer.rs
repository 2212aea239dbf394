/// Paces work against a free-running millisecond clock.
/// The clock is allowed to wrap; elapsed time is computed with wrapping math.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Interval {
    period_ms: u32,
    last_ms: u32,
}

impl Interval {
    /// The first period is measured from clock zero, not from construction
    pub const fn new(period_ms: u32) -> Interval {
        Self {
            period_ms,
            last_ms: 0,
        }
    }

    pub fn elapsed(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.last_ms)
    }

    pub fn is_due(&self, now_ms: u32) -> bool {
        self.elapsed(now_ms) >= self.period_ms
    }

    pub fn restart(&mut self, now_ms: u32) {
        self.last_ms = now_ms;
    }

    /// Restarts and returns true if a full period has passed
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if self.is_due(now_ms) {
            self.restart(now_ms);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_period_counts_from_zero() {
        let mut interval = Interval::new(2000);
        assert!(!interval.poll(0));
        assert!(!interval.poll(1999));
        assert!(interval.poll(2000));
        assert!(!interval.poll(3999));
        assert!(interval.poll(4100));
        assert!(!interval.poll(6000));
    }

    #[test]
    fn survives_clock_wrap() {
        let mut interval = Interval::new(2000);
        interval.restart(u32::MAX - 500);
        assert!(!interval.is_due(1000));
        assert_eq!(interval.elapsed(1499), 2000);
        assert!(interval.poll(1499));
    }

    #[test]
    fn short_periods_fire_early() {
        let interval = Interval::new(500);
        assert!(!interval.is_due(499));
        assert!(interval.is_due(500));
    }
}
