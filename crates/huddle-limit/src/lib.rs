//! Rate limiter entity for Huddle.
//!
//! Throttles repeated room-creation attempts per originating address
//! with escalating delays: each accepted attempt inside the cooldown
//! window raises the wait required before the next one, without ever
//! hard-banning. A quiet spell longer than the cooldown (or an explicit
//! reset, granted when an address successfully joins a room) returns
//! the address to first-use state.
//!
//! The limiter is a single actor; its records are sharded internally
//! by address under `rate:{addr}` storage keys.

mod config;
mod entity;
mod entry;
mod error;

pub use config::LimitConfig;
pub use entity::{spawn_limiter, RateLimiterHandle};
pub use entry::RateEntry;
pub use error::LimitError;
