//! Room entity for Huddle.
//!
//! Each room is a single persisted record mutated by exactly one tokio
//! task (actor model): commands arrive on an mpsc channel and are
//! answered through oneshot replies, so "read record, check invariant,
//! mutate, write record" needs no locks. Rooms expire lazily — the
//! first access after the TTL deletes the record and reports the room
//! as never having existed.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — spawns/caches one actor per room hash
//! - [`RoomHandle`] — send operations to a running room actor
//! - [`Room`] — the persisted record
//! - [`RoomConfig`] — TTL, message cap, nickname limits

mod config;
mod entity;
mod error;
mod record;
mod registry;
mod token;

pub use config::RoomConfig;
pub use entity::{spawn_room, RoomHandle};
pub use error::RoomError;
pub use record::{Member, Room};
pub use registry::RoomRegistry;
pub use token::generate_token;
