//! Time origin and the clock it is read from.
//!
//! The origin is a plain value. It is captured once at the top of `main` and
//! passed down to whatever owns the probe; there is no process-wide slot to
//! forget to fill.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::metric::Millis;

/// Millisecond clock used for both the origin and the checkpoints.
///
/// Readings must be non-decreasing; the probe relies on it for
/// `interactive >= first_paint`.
pub trait Clock {
    /// Current time in milliseconds since the UNIX epoch (or any fixed base
    /// shared with the origin).
    fn now_ms(&self) -> u64;
}

/// Wall-anchored monotonic clock.
///
/// One `SystemTime` reading taken at construction gives the epoch base; every
/// later reading adds the `Instant` elapsed since then, so wall-clock
/// adjustments during the run cannot move time backwards.
#[derive(Debug, Clone)]
pub struct SystemClock {
    anchor_ms: u64,
    anchor: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        // Taken back to back; the gap between them is far below 1 ms.
        let wall = SystemTime::now();
        let anchor = Instant::now();

        let anchor_ms = wall
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as u64;

        Self { anchor_ms, anchor }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.anchor_ms
            .saturating_add(self.anchor.elapsed().as_millis() as u64)
    }
}

/// Reference timestamp (T0) for one measurement session.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Origin {
    epoch_ms: u64,
}

impl Origin {
    /// Reads `clock` once. Call this before anything else in `main`.
    pub fn capture(clock: &dyn Clock) -> Self {
        Self { epoch_ms: clock.now_ms() }
    }

    /// Builds an origin from an already-known timestamp.
    pub const fn from_millis(epoch_ms: u64) -> Self {
        Self { epoch_ms }
    }

    pub const fn as_millis(self) -> u64 {
        self.epoch_ms
    }

    /// Elapsed time from the origin to `now_ms`, clamped at zero.
    pub fn elapsed_at(self, now_ms: u64) -> Millis {
        Millis(now_ms.saturating_sub(self.epoch_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualClock;

    #[test]
    fn capture_reads_clock_once() {
        let clock = ManualClock::new(1000);
        let origin = Origin::capture(&clock);
        clock.advance(50);
        assert_eq!(origin.as_millis(), 1000);
    }

    #[test]
    fn elapsed_is_difference() {
        let origin = Origin::from_millis(1000);
        assert_eq!(origin.elapsed_at(1142), Millis(142));
        assert_eq!(origin.elapsed_at(1000), Millis(0));
    }

    #[test]
    fn elapsed_before_origin_clamps_to_zero() {
        assert_eq!(Origin::from_millis(500).elapsed_at(499), Millis(0));
    }

    #[test]
    fn system_clock_is_non_decreasing() {
        let clock = SystemClock::new();
        let mut last = clock.now_ms();
        for _ in 0..1000 {
            let now = clock.now_ms();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn system_clock_is_epoch_based() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock::new().now_ms() > 1_577_836_800_000);
    }
}
