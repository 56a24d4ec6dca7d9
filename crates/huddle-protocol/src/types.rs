//! Core boundary types: room keys, room mode, and the message shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Required length of a room hash, in characters.
pub const ROOM_HASH_LEN: usize = 16;

/// A validated room identifier.
///
/// Room hashes are opaque 16-character strings chosen by clients. The
/// hash doubles as the storage key for the room record, so the length
/// check happens *before* any entity or storage access — a malformed
/// hash must never reach the keyed layer.
///
/// `#[serde(transparent)]` makes this serialize as a plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomHash(String);

impl RoomHash {
    /// Validates and wraps a room hash.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidRoomHash`] unless the input is
    /// exactly [`ROOM_HASH_LEN`] characters.
    pub fn parse(s: &str) -> Result<Self, ProtocolError> {
        if s.chars().count() != ROOM_HASH_LEN {
            return Err(ProtocolError::InvalidRoomHash(s.chars().count()));
        }
        Ok(Self(s.to_string()))
    }

    /// Returns the hash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Behavioral mode of a room.
///
/// Currently a single variant; the field is carried on every room
/// summary so future modes don't change the wire shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomMode {
    #[default]
    Standard,
}

impl fmt::Display for RoomMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("standard"),
        }
    }
}

/// One message retained in a room's bounded window.
///
/// `timestamp` is fractional seconds since the Unix epoch. Messages are
/// ordered by arrival; timestamps are non-decreasing because every
/// mutation of one room happens on a single task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Opaque 12-character message id.
    pub id: String,
    /// Display name resolved at send time.
    pub sender: String,
    /// Message body.
    pub content: String,
    /// Arrival time, seconds since epoch.
    pub timestamp: f64,
}
