//! The per-address record and the escalation decision itself.
//!
//! `evaluate` is a pure function of (record, now, config) so the whole
//! backoff algorithm is unit-testable without storage or tasks.

use serde::{Deserialize, Serialize};

use crate::LimitConfig;

/// Per-address throttle state, stored under `rate:{addr}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    /// Consecutive accounted attempts since the last full reset.
    /// Always at least 1 once a record exists.
    pub count: u32,
    /// Timestamp of the most recent *accepted* attempt, seconds since
    /// epoch. Denied attempts do not touch it.
    pub last_attempt: f64,
}

/// Outcome of evaluating one attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Outcome {
    /// Attempt accepted; write this record back.
    Allowed(RateEntry),
    /// Attempt denied; leave the stored record untouched.
    Denied { retry_after: u64 },
}

/// Applies the escalation rules to one attempt.
///
/// - No record, or quiet for longer than the cooldown: accept and
///   restart the count at 1.
/// - Otherwise the attempt must have waited at least the table delay
///   for the current count; if it has, accept and bump the count, else
///   deny with the remaining wait (rounded up to whole seconds).
pub(crate) fn evaluate(entry: Option<RateEntry>, now: f64, config: &LimitConfig) -> Outcome {
    let Some(entry) = entry else {
        return Outcome::Allowed(RateEntry { count: 1, last_attempt: now });
    };

    let elapsed = now - entry.last_attempt;
    if elapsed > config.cooldown.as_secs_f64() {
        return Outcome::Allowed(RateEntry { count: 1, last_attempt: now });
    }

    let required = config.required_delay(entry.count) as f64;
    if elapsed >= required {
        Outcome::Allowed(RateEntry { count: entry.count + 1, last_attempt: now })
    } else {
        Outcome::Denied { retry_after: (required - elapsed).ceil() as u64 }
    }
}
