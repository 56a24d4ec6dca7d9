//! Wall-clock abstraction.
//!
//! Timestamps throughout Huddle are `f64` seconds since the Unix epoch
//! (fractional precision matters: poll cursors compare against message
//! timestamps). TTL and cooldown arithmetic works on these values, so
//! injecting the clock makes expiry and backoff fully deterministic in
//! tests.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of "now", in seconds since the Unix epoch.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> f64;
}

/// The real wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            // The system clock sitting before 1970 is not a state this
            // process can meaningfully run in.
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// A hand-driven clock for tests.
///
/// Starts at an arbitrary instant and only moves when told to, so
/// TTL-boundary and backoff tests can cross exact thresholds.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<f64>,
}

impl ManualClock {
    /// Creates a clock frozen at `start` seconds since epoch.
    pub fn new(start: f64) -> Self {
        Self { now: Mutex::new(start) }
    }

    /// Moves the clock forward by `secs`.
    pub fn advance(&self, secs: f64) {
        if let Ok(mut now) = self.now.lock() {
            *now += secs;
        }
    }

    /// Jumps the clock to an absolute time.
    pub fn set(&self, secs: f64) {
        if let Ok(mut now) = self.now.lock() {
            *now = secs;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.lock().map(|n| *n).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_past_2020() {
        // 2020-01-01 in epoch seconds; catches a zeroed clock.
        assert!(SystemClock.now() > 1_577_836_800.0);
    }

    #[test]
    fn test_manual_clock_starts_frozen() {
        let clock = ManualClock::new(1000.0);
        assert_eq!(clock.now(), 1000.0);
        assert_eq!(clock.now(), 1000.0);
    }

    #[test]
    fn test_manual_clock_advance_and_set() {
        let clock = ManualClock::new(1000.0);
        clock.advance(0.5);
        assert_eq!(clock.now(), 1000.5);
        clock.set(5000.0);
        assert_eq!(clock.now(), 5000.0);
    }
}
