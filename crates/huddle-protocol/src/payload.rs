//! Request payloads for room operations.
//!
//! Every field is optional or defaulted: the boundary treats a missing
//! or unparseable request body as an empty payload, so `{}` must
//! deserialize into every payload type. "Required" fields are enforced
//! by the entity (e.g. missing `content` on send), not by serde.

use serde::{Deserialize, Serialize};

/// Payload for `create`.
///
/// The carried `room_hash` must match the key the request was routed
/// to; a mismatch (or an absent field) is rejected. This guards against
/// a payload replayed against a different room key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePayload {
    #[serde(default)]
    pub room_hash: Option<String>,
}

/// Payload for `join`. Nickname defaults to `"anon"` and is truncated
/// to the configured maximum.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JoinPayload {
    #[serde(default)]
    pub nickname: Option<String>,
}

/// Payload for `send`.
///
/// If `member_id` names a known member, the stored nickname wins over
/// the caller-supplied `sender` string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendPayload {
    #[serde(default)]
    pub member_id: Option<String>,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Payload for `poll`. `since` is exclusive: only messages with a
/// strictly greater timestamp are returned. Defaults to 0 (everything
/// retained).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollPayload {
    #[serde(default)]
    pub since: f64,
}

/// Payload for `leave`. An unknown or absent `member_id` is a no-op
/// success, not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeavePayload {
    #[serde(default)]
    pub member_id: Option<String>,
}
