//! Error codes visible at the boundary, and protocol-level errors.

use serde::{Deserialize, Serialize};

/// Errors raised while validating boundary input.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The room hash is not exactly 16 characters (got this many).
    #[error("room hash must be exactly 16 characters, got {0}")]
    InvalidRoomHash(usize),
}

/// The machine-readable error taxonomy callers see.
///
/// Each code maps to one HTTP-style status number. The string form is
/// what lands in the JSON error body, e.g. `{"error": "room_exists"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed or mismatched room hash.
    InvalidRoomHash,
    /// A live room already exists under this hash.
    RoomExists,
    /// No live room under this hash (never existed, or expired).
    RoomNotFound,
    /// `send` with an absent or empty `content`.
    MissingContent,
    /// The caller must wait before creating another room.
    RateLimited,
    /// The persistence layer failed; nothing was mutated.
    StorageFailure,
}

impl ErrorCode {
    /// The snake_case wire form of the code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRoomHash => "invalid_room_hash",
            Self::RoomExists => "room_exists",
            Self::RoomNotFound => "room_not_found",
            Self::MissingContent => "missing_content",
            Self::RateLimited => "rate_limited",
            Self::StorageFailure => "storage_failure",
        }
    }

    /// The HTTP-style status number for the code.
    pub fn status(self) -> u16 {
        match self {
            Self::InvalidRoomHash | Self::MissingContent => 400,
            Self::RoomNotFound => 404,
            Self::RoomExists => 409,
            Self::RateLimited => 429,
            Self::StorageFailure => 500,
        }
    }
}
