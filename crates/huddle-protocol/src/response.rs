//! Success-response shapes for room and rate-limiter operations.
//!
//! These structs serialize to the exact JSON bodies clients receive.
//! Field names are part of the contract.

use serde::{Deserialize, Serialize};

use crate::{ChatMessage, RoomHash, RoomMode};

/// Returned by `create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomCreated {
    pub room_hash: RoomHash,
    pub mode: RoomMode,
    pub created_at: f64,
    pub expires_at: f64,
    /// Fresh member id for the creator (nickname `"creator"`).
    pub member_id: String,
    /// Member nicknames in join order.
    pub members: Vec<String>,
}

/// Returned by `join`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomJoined {
    pub room_hash: RoomHash,
    pub mode: RoomMode,
    pub created_at: f64,
    pub expires_at: f64,
    /// Fresh member id for the joiner.
    pub member_id: String,
    pub members: Vec<String>,
    pub message_count: usize,
    /// Timestamp of the newest retained message, 0 if none. Lets the
    /// joiner start polling without replaying history.
    pub last_message_ts: f64,
}

/// Returned by `send`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageAck {
    pub id: String,
    pub timestamp: f64,
}

/// Returned by `poll`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollResponse {
    /// Messages newer than the requested `since`, in arrival order.
    pub messages: Vec<ChatMessage>,
    pub members: Vec<String>,
    pub expires_at: f64,
    /// Total retained count, not just the slice returned.
    pub message_count: usize,
}

/// Returned by `info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDetails {
    pub room_hash: RoomHash,
    pub mode: RoomMode,
    pub created_at: f64,
    pub expires_at: f64,
    pub members: Vec<String>,
    pub message_count: usize,
    /// Whole seconds until expiry, clamped at 0.
    pub time_remaining: u64,
}

/// Returned by the rate limiter's `check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateDecision {
    pub allowed: bool,
    /// Whole seconds to wait before retrying; 0 when allowed.
    pub retry_after: u64,
}
