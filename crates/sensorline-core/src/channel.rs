//! Per-measurement smoothing with outlier rejection.
//!
//! A channel keeps the last `N` raw samples in a ring. Every offered sample is
//! checked against the slot just behind the write cursor; samples that stray
//! more than 20% from it are kept out of the ring. The cursor moves on every
//! offer, accepted or not, so a rejected sample leaves the stale slot in the
//! average for one more rotation.
//!
//! Values are fixed-point integers (hundredths of a degree, hundredths of a
//! percent, whole hPa). Zero doubles as the "no data yet" sentinel, which is
//! why averages read low until the ring has filled once.

use crate::config::HISTORY_DEPTH;

/// Inclusive physical range a reading must fall in under [`FilterPolicy::Nudge`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Limits {
    pub min: i32,
    pub max: i32,
}

impl Limits {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub const fn contains(&self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// How a channel treats a sample outside the 20% band
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FilterPolicy {
    /// Drop the sample; the slot keeps its previous contents.
    #[default]
    Reject,
    /// Never discard against a reference: a sample outside `Limits` or the
    /// band stores the reference moved 1% towards it instead.
    Nudge(Limits),
}

/// What [`SmoothedChannel::offer`] did with a sample
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verdict {
    Accepted,
    Rejected,
    /// Range or band check failed; this value was stored in its place.
    Nudged(i32),
    /// Outside the policy's physical limits with only the zero sentinel to
    /// nudge from; nothing stored.
    OutOfRange,
}

#[derive(Clone, Debug)]
pub struct SmoothedChannel<const N: usize = HISTORY_DEPTH> {
    history: [i32; N],
    cursor: usize,
    policy: FilterPolicy,
}

impl<const N: usize> Default for SmoothedChannel<N> {
    fn default() -> Self {
        Self::new(FilterPolicy::Reject)
    }
}

impl<const N: usize> SmoothedChannel<N> {
    /// All-zero history, cursor at slot 0
    pub const fn new(policy: FilterPolicy) -> Self {
        assert!(N > 0, "channel needs at least one slot");
        Self {
            history: [0; N],
            cursor: 0,
            policy,
        }
    }

    pub fn policy(&self) -> FilterPolicy {
        self.policy
    }

    pub fn history(&self) -> &[i32; N] {
        &self.history
    }

    /// Slot the next offer writes to
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Value the next offer is compared against.
    ///
    /// This is the slot immediately behind the cursor, read before the write.
    /// After a rejection it still holds whatever was stored a full rotation
    /// earlier, so the comparison does not always track the latest tick.
    pub fn reference(&self) -> i32 {
        self.history[(self.cursor + N - 1) % N]
    }

    /// Offers one raw sample and advances the cursor.
    pub fn offer(&mut self, value: i32) -> Verdict {
        let prev = self.reference();
        let verdict = match self.policy {
            FilterPolicy::Reject => Self::check_band(value, prev),
            FilterPolicy::Nudge(limits) => Self::check_nudge(value, prev, limits),
        };

        match verdict {
            Verdict::Accepted => self.history[self.cursor] = value,
            Verdict::Nudged(nudged) => self.history[self.cursor] = nudged,
            Verdict::Rejected | Verdict::OutOfRange => {}
        }
        self.cursor = (self.cursor + 1) % N;

        verdict
    }

    /// Truncating mean of every slot, zero sentinels included
    pub fn average(&self) -> i32 {
        let sum: i64 = self.history.iter().map(|&v| i64::from(v)).sum();
        (sum / N as i64) as i32
    }

    /// `|value - prev| <= prev / 5` with truncating division.
    /// A negative `prev` gives a negative band, which nothing can satisfy.
    fn check_band(value: i32, prev: i32) -> Verdict {
        if prev == 0 {
            return Verdict::Accepted;
        }

        let band = prev / 5;
        if band >= 0 && value.abs_diff(prev) <= band as u32 {
            Verdict::Accepted
        } else {
            Verdict::Rejected
        }
    }

    fn check_nudge(value: i32, prev: i32, limits: Limits) -> Verdict {
        let in_range = limits.contains(value);
        if prev == 0 {
            return if in_range {
                Verdict::Accepted
            } else {
                Verdict::OutOfRange
            };
        }

        let magnitude = prev.unsigned_abs();
        if in_range && value.abs_diff(prev) <= magnitude / 5 {
            return Verdict::Accepted;
        }

        // 1% of the reference, at least one unit so small values still move
        let step = (magnitude / 100).max(1) as i32;
        let nudged = if value > prev {
            prev.saturating_add(step)
        } else {
            prev.saturating_sub(step)
        };
        Verdict::Nudged(nudged)
    }
}
