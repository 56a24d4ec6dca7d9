//! Rate limiter configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the rate limiter.
///
/// `delays[min(count, delays.len() - 1)]` is the wait required before
/// attempt `count + 1` is accepted. Indexing by attempt count (capped
/// at the table end) makes each additional attempt inside the cooldown
/// window wait strictly longer, up to the final plateau.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    /// Quiet period after which an address fully resets to first use.
    pub cooldown: Duration,

    /// Escalating required-wait table, in seconds.
    pub delays: Vec<u64>,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(1800),
            delays: vec![0, 10, 30, 60, 180, 300],
        }
    }
}

impl LimitConfig {
    /// Required wait in seconds before the next attempt, given the
    /// current consecutive-attempt count.
    pub fn required_delay(&self, count: u32) -> u64 {
        debug_assert!(!self.delays.is_empty());
        let idx = (count as usize).min(self.delays.len().saturating_sub(1));
        self.delays.get(idx).copied().unwrap_or(0)
    }
}
