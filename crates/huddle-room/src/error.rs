//! Error types for the room layer.

use huddle_protocol::RoomHash;
use huddle_store::StorageError;

/// Errors that can occur during room operations.
///
/// An expired room is *not* a distinct case — expiry collapses to
/// [`RoomError::NotFound`] so an expired room is indistinguishable
/// from one that never existed.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No live room under this hash.
    #[error("room {0} not found")]
    NotFound(RoomHash),

    /// A live room already exists under this hash.
    #[error("room {0} already exists")]
    AlreadyExists(RoomHash),

    /// The request was malformed (mismatched hash, missing content).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The persistence layer failed; the operation mutated nothing.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The room's command channel is full or closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomHash),
}
