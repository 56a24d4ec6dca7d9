//! The persisted room record.

use serde::{Deserialize, Serialize};

use huddle_protocol::{ChatMessage, RoomHash, RoomMode};

/// One member of a room: an opaque id mapped to a display nickname.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub nickname: String,
}

/// The room record, as serialized into storage under `room:{hash}`.
///
/// Members live in a `Vec` rather than a map so nickname listings come
/// back in join order. Rooms are small and short-lived; linear member
/// lookup is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// The room's own hash. Checked against the storage key on every
    /// load to catch key-routing mistakes.
    pub room_hash: RoomHash,
    pub mode: RoomMode,
    /// Creation time, seconds since epoch.
    pub created_at: f64,
    /// `created_at + ttl`. A room observed past this point is deleted
    /// and reported as absent.
    pub expires_at: f64,
    pub members: Vec<Member>,
    /// Bounded window of recent messages, oldest first.
    pub messages: Vec<ChatMessage>,
}

impl Room {
    /// Builds a fresh, empty room.
    pub fn new(room_hash: RoomHash, created_at: f64, ttl_secs: f64) -> Self {
        Self {
            room_hash,
            mode: RoomMode::Standard,
            created_at,
            expires_at: created_at + ttl_secs,
            members: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Returns `true` once the TTL has elapsed.
    pub fn is_expired(&self, now: f64) -> bool {
        now > self.expires_at
    }

    /// Member nicknames in join order.
    pub fn nicknames(&self) -> Vec<String> {
        self.members.iter().map(|m| m.nickname.clone()).collect()
    }

    /// Looks up a member's nickname by id.
    pub fn member_nickname(&self, id: &str) -> Option<&str> {
        self.members
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.nickname.as_str())
    }

    /// Adds a member.
    pub fn add_member(&mut self, id: String, nickname: String) {
        self.members.push(Member { id, nickname });
    }

    /// Removes a member by id. Returns `true` if one was removed.
    pub fn remove_member(&mut self, id: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m.id != id);
        self.members.len() != before
    }

    /// Appends a message, then trims the window to `max` entries by
    /// dropping the oldest.
    pub fn push_message(&mut self, msg: ChatMessage, max: usize) {
        self.messages.push(msg);
        if self.messages.len() > max {
            let excess = self.messages.len() - max;
            self.messages.drain(..excess);
        }
    }

    /// Timestamp of the newest retained message, 0 if none.
    pub fn last_message_ts(&self) -> f64 {
        self.messages.last().map(|m| m.timestamp).unwrap_or(0.0)
    }

    /// Messages strictly newer than `since`, in arrival order.
    pub fn messages_since(&self, since: f64) -> Vec<ChatMessage> {
        self.messages
            .iter()
            .filter(|m| m.timestamp > since)
            .cloned()
            .collect()
    }

    /// Whole seconds until expiry, clamped at 0.
    pub fn time_remaining(&self, now: f64) -> u64 {
        let remaining = self.expires_at - now;
        if remaining <= 0.0 { 0 } else { remaining.floor() as u64 }
    }
}
