//! Boundary data model for Huddle.
//!
//! This crate defines everything that crosses the relay's outer edge:
//! the validated room-hash key, the request payloads, the success
//! response shapes, and the machine-readable error codes with their
//! HTTP-style status numbers. The shapes here are a contract with
//! clients — changing a field name is a breaking change.
//!
//! # Key types
//!
//! - [`RoomHash`] — validated 16-character room key
//! - [`ChatMessage`] — one retained message
//! - [`ErrorCode`] — the error taxonomy visible to callers

mod error;
mod payload;
mod response;
mod types;

pub use error::{ErrorCode, ProtocolError};
pub use payload::{CreatePayload, JoinPayload, LeavePayload, PollPayload, SendPayload};
pub use response::{
    MessageAck, PollResponse, RateDecision, RoomCreated, RoomDetails, RoomJoined,
};
pub use types::{ChatMessage, RoomHash, RoomMode, ROOM_HASH_LEN};
