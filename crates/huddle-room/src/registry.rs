//! Room registry: spawns and caches one actor per room hash.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use huddle_protocol::RoomHash;
use huddle_store::{Clock, Storage};

use crate::entity::spawn_room;
use crate::{RoomConfig, RoomHandle};

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Routes operations to per-hash room actors, spawning them on demand.
///
/// The registry only guarantees one actor per hash; whether that hash
/// names a live room is the actor's business (it consults storage on
/// every command). The handle map is guarded by a std mutex — it is
/// never held across an await.
pub struct RoomRegistry {
    rooms: Mutex<HashMap<RoomHash, RoomHandle>>,
    config: RoomConfig,
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
}

impl RoomRegistry {
    /// Creates a registry over the given storage and clock.
    pub fn new(config: RoomConfig, storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            config,
            storage,
            clock,
        }
    }

    /// Returns the handle for `hash`, spawning the actor if needed.
    pub fn handle(&self, hash: &RoomHash) -> RoomHandle {
        let mut rooms = match self.rooms.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        rooms
            .entry(hash.clone())
            .or_insert_with(|| {
                spawn_room(
                    hash.clone(),
                    self.config.clone(),
                    Arc::clone(&self.storage),
                    Arc::clone(&self.clock),
                    DEFAULT_CHANNEL_SIZE,
                )
            })
            .clone()
    }

    /// Number of room actors currently spawned.
    ///
    /// An operator signal, not a count of live rooms: actors persist
    /// for hashes whose records have since expired.
    pub fn room_count(&self) -> usize {
        self.rooms.lock().map(|m| m.len()).unwrap_or(0)
    }
}
