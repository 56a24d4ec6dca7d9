//! The gateway: boundary validation, payload parsing, entity routing,
//! and the rate-limiter coupling.
//!
//! Control flow for the coupled operations:
//! - `create` consults the rate limiter first; only an allowed attempt
//!   reaches the room entity.
//! - a successful `join` resets the joiner's rate entry, rewarding
//!   addresses that participate instead of just creating rooms. Create
//!   itself earns no reward — that would pay the creator of a
//!   potentially abusive room before anyone else interacts with it.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use huddle_limit::{spawn_limiter, LimitConfig, RateLimiterHandle};
use huddle_protocol::{
    CreatePayload, ErrorCode, JoinPayload, LeavePayload, PollPayload, RoomHash, SendPayload,
};
use huddle_room::{RoomConfig, RoomError, RoomRegistry};
use huddle_store::{Clock, MemoryStorage, Storage, SystemClock};

use crate::ApiResponse;

/// Builder for a [`Gateway`].
///
/// Defaults to in-memory storage and the system clock; production
/// deployments inject their own storage, tests inject a manual clock.
pub struct GatewayBuilder {
    room_config: RoomConfig,
    limit_config: LimitConfig,
    storage: Option<Arc<dyn Storage>>,
    clock: Option<Arc<dyn Clock>>,
}

impl GatewayBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            room_config: RoomConfig::default(),
            limit_config: LimitConfig::default(),
            storage: None,
            clock: None,
        }
    }

    /// Overrides the room configuration (TTL, message cap).
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Overrides the rate-limiter configuration.
    pub fn limit_config(mut self, config: LimitConfig) -> Self {
        self.limit_config = config;
        self
    }

    /// Sets the storage backend shared by both entities.
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Sets the clock shared by both entities.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds the gateway, spawning the limiter actor.
    pub fn build(self) -> Gateway {
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStorage::new()));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let rooms = RoomRegistry::new(self.room_config, Arc::clone(&storage), Arc::clone(&clock));
        let limiter = spawn_limiter(self.limit_config, storage, clock);

        Gateway { rooms, limiter }
    }
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The relay's outer surface. One instance per process; cheap to share
/// behind an `Arc` from whatever router fronts it.
pub struct Gateway {
    rooms: RoomRegistry,
    limiter: RateLimiterHandle,
}

impl Gateway {
    /// Starts building a gateway.
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::new()
    }

    /// Creates a room, rate-limiting by the caller's address.
    pub async fn create(
        &self,
        room_hash: &str,
        client_ip: &str,
        body: Option<&str>,
    ) -> ApiResponse {
        let Some(hash) = parse_hash(room_hash) else {
            return ApiResponse::error(ErrorCode::InvalidRoomHash);
        };
        let payload: CreatePayload = parse_payload(body);

        match self.limiter.check(client_ip).await {
            Ok(decision) if !decision.allowed => {
                return ApiResponse::rate_limited(decision.retry_after);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "rate limiter check failed");
                return ApiResponse::error(ErrorCode::StorageFailure);
            }
        }

        match self.rooms.handle(&hash).create(payload.room_hash).await {
            Ok(created) => ok_json(&created),
            Err(e) => room_error(e, ErrorCode::InvalidRoomHash),
        }
    }

    /// Joins a room; success resets the joiner's rate entry.
    pub async fn join(&self, room_hash: &str, client_ip: &str, body: Option<&str>) -> ApiResponse {
        let Some(hash) = parse_hash(room_hash) else {
            return ApiResponse::error(ErrorCode::InvalidRoomHash);
        };
        let payload: JoinPayload = parse_payload(body);

        match self.rooms.handle(&hash).join(payload.nickname).await {
            Ok(joined) => {
                // Reward legitimate use; best-effort, the join stands
                // even if the reset can't be recorded.
                if let Err(e) = self.limiter.reset(client_ip).await {
                    tracing::warn!(error = %e, "rate reset after join failed");
                }
                ok_json(&joined)
            }
            Err(e) => room_error(e, ErrorCode::InvalidRoomHash),
        }
    }

    /// Appends a message to a room.
    pub async fn send(&self, room_hash: &str, body: Option<&str>) -> ApiResponse {
        let Some(hash) = parse_hash(room_hash) else {
            return ApiResponse::error(ErrorCode::InvalidRoomHash);
        };
        let payload: SendPayload = parse_payload(body);

        match self
            .rooms
            .handle(&hash)
            .send(payload.member_id, payload.sender, payload.content)
            .await
        {
            Ok(ack) => ok_json(&ack),
            Err(e) => room_error(e, ErrorCode::MissingContent),
        }
    }

    /// Returns messages strictly newer than the payload's `since`.
    pub async fn poll(&self, room_hash: &str, body: Option<&str>) -> ApiResponse {
        let Some(hash) = parse_hash(room_hash) else {
            return ApiResponse::error(ErrorCode::InvalidRoomHash);
        };
        let payload: PollPayload = parse_payload(body);

        match self.rooms.handle(&hash).poll(payload.since).await {
            Ok(resp) => ok_json(&resp),
            Err(e) => room_error(e, ErrorCode::InvalidRoomHash),
        }
    }

    /// Removes a member from a room. Idempotent.
    pub async fn leave(&self, room_hash: &str, body: Option<&str>) -> ApiResponse {
        let Some(hash) = parse_hash(room_hash) else {
            return ApiResponse::error(ErrorCode::InvalidRoomHash);
        };
        let payload: LeavePayload = parse_payload(body);

        match self.rooms.handle(&hash).leave(payload.member_id).await {
            Ok(()) => ApiResponse::ok(json!({ "status": "left" })),
            Err(e) => room_error(e, ErrorCode::InvalidRoomHash),
        }
    }

    /// Returns a room summary with its remaining lifetime.
    pub async fn info(&self, room_hash: &str) -> ApiResponse {
        let Some(hash) = parse_hash(room_hash) else {
            return ApiResponse::error(ErrorCode::InvalidRoomHash);
        };

        match self.rooms.handle(&hash).info().await {
            Ok(details) => ok_json(&details),
            Err(e) => room_error(e, ErrorCode::InvalidRoomHash),
        }
    }

    /// Accounts a creation attempt for `ip` without creating anything.
    pub async fn rate_check(&self, ip: &str) -> ApiResponse {
        match self.limiter.check(ip).await {
            Ok(decision) => ok_json(&decision),
            Err(e) => {
                tracing::error!(error = %e, "rate limiter check failed");
                ApiResponse::error(ErrorCode::StorageFailure)
            }
        }
    }

    /// Returns `ip` to first-use state.
    pub async fn rate_reset(&self, ip: &str) -> ApiResponse {
        match self.limiter.reset(ip).await {
            Ok(()) => ApiResponse::ok(json!({ "status": "ok" })),
            Err(e) => {
                tracing::error!(error = %e, "rate limiter reset failed");
                ApiResponse::error(ErrorCode::StorageFailure)
            }
        }
    }
}

/// Validates the path's room hash. `None` short-circuits to a 400
/// before any entity or storage access.
fn parse_hash(room_hash: &str) -> Option<RoomHash> {
    RoomHash::parse(room_hash).ok()
}

/// Parses a request body leniently: a missing or unparseable body is
/// an empty payload. Required fields are the entities' concern.
fn parse_payload<T: Default + DeserializeOwned>(body: Option<&str>) -> T {
    let Some(body) = body else {
        return T::default();
    };
    match serde_json::from_str(body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!(error = %e, "unparseable request body, using empty payload");
            T::default()
        }
    }
}

fn ok_json<T: Serialize>(value: &T) -> ApiResponse {
    match serde_json::to_value(value) {
        Ok(body) => ApiResponse::ok(body),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode response");
            ApiResponse::error(ErrorCode::StorageFailure)
        }
    }
}

/// Maps a room error to its boundary response. `invalid_input` is the
/// per-operation code for [`RoomError::InvalidInput`] — a mismatched
/// hash on create, missing content on send.
fn room_error(err: RoomError, invalid_input: ErrorCode) -> ApiResponse {
    match err {
        RoomError::NotFound(_) => ApiResponse::error(ErrorCode::RoomNotFound),
        RoomError::AlreadyExists(_) => ApiResponse::error(ErrorCode::RoomExists),
        RoomError::InvalidInput(_) => ApiResponse::error(invalid_input),
        RoomError::Storage(e) => {
            tracing::error!(error = %e, "room storage failure");
            ApiResponse::error(ErrorCode::StorageFailure)
        }
        RoomError::Unavailable(hash) => {
            tracing::error!(room = %hash, "room actor unavailable");
            ApiResponse::error(ErrorCode::StorageFailure)
        }
    }
}
