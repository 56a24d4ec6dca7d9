//! Storage and clock seams for Huddle entities.
//!
//! Entities own their records exclusively and mutate them on a single
//! task per key, so the storage contract is deliberately small: opaque
//! bytes under string keys, with get/put/delete. Durability beyond the
//! process is a property of the chosen [`Storage`] implementation, not
//! of the entities.
//!
//! The [`Clock`] trait exists because room TTLs and limiter cooldowns
//! must be testable without sleeping; production code uses
//! [`SystemClock`], tests drive a [`ManualClock`].

mod clock;
mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use storage::{MemoryStorage, Storage, StorageError};
