//! Room actor: an isolated tokio task that owns one room record.
//!
//! Each room hash gets its own task, communicating with the outside
//! world through an mpsc channel. The per-key single-threading this
//! gives us is what makes every handler's read-validate-mutate-write
//! sequence safe without locks.
//!
//! Every command re-reads the record from storage and checks expiry
//! before acting; no state is cached between commands.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use huddle_protocol::{
    ChatMessage, MessageAck, PollResponse, RoomCreated, RoomDetails, RoomHash, RoomJoined,
};
use huddle_store::{Clock, Storage, StorageError};

use crate::token::generate_token;
use crate::{Room, RoomConfig, RoomError};

/// Storage key for a room record.
fn storage_key(hash: &RoomHash) -> String {
    format!("room:{hash}")
}

/// Operations sent to a room actor through its channel.
///
/// Each variant carries a `oneshot::Sender` reply channel; the caller
/// awaits the reply, so no operation returns before its mutation is
/// written to storage.
pub(crate) enum RoomCommand {
    Create {
        /// The hash carried in the payload, which must match the key.
        requested: Option<String>,
        reply: oneshot::Sender<Result<RoomCreated, RoomError>>,
    },
    Join {
        nickname: Option<String>,
        reply: oneshot::Sender<Result<RoomJoined, RoomError>>,
    },
    Send {
        member_id: Option<String>,
        sender: Option<String>,
        content: Option<String>,
        reply: oneshot::Sender<Result<MessageAck, RoomError>>,
    },
    Poll {
        since: f64,
        reply: oneshot::Sender<Result<PollResponse, RoomError>>,
    },
    Leave {
        member_id: Option<String>,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Info {
        reply: oneshot::Sender<Result<RoomDetails, RoomError>>,
    },
}

/// Handle to a running room actor. Cheap to clone.
#[derive(Clone)]
pub struct RoomHandle {
    room_hash: RoomHash,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// The hash this handle routes to.
    pub fn room_hash(&self) -> &RoomHash {
        &self.room_hash
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<T, RoomError>>) -> RoomCommand,
    ) -> Result<T, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(make(reply_tx))
            .await
            .map_err(|_| RoomError::Unavailable(self.room_hash.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_hash.clone()))?
    }

    /// Creates the room. Fails if a live room already exists, or if
    /// `requested` does not match this room's hash.
    pub async fn create(&self, requested: Option<String>) -> Result<RoomCreated, RoomError> {
        self.request(|reply| RoomCommand::Create { requested, reply }).await
    }

    /// Joins the room with an optional nickname.
    pub async fn join(&self, nickname: Option<String>) -> Result<RoomJoined, RoomError> {
        self.request(|reply| RoomCommand::Join { nickname, reply }).await
    }

    /// Appends a message to the room.
    pub async fn send(
        &self,
        member_id: Option<String>,
        sender: Option<String>,
        content: Option<String>,
    ) -> Result<MessageAck, RoomError> {
        self.request(|reply| RoomCommand::Send { member_id, sender, content, reply })
            .await
    }

    /// Returns messages strictly newer than `since`.
    pub async fn poll(&self, since: f64) -> Result<PollResponse, RoomError> {
        self.request(|reply| RoomCommand::Poll { since, reply }).await
    }

    /// Removes a member. Unknown or absent ids are a no-op success.
    pub async fn leave(&self, member_id: Option<String>) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Leave { member_id, reply }).await
    }

    /// Returns the room summary and remaining lifetime.
    pub async fn info(&self) -> Result<RoomDetails, RoomError> {
        self.request(|reply| RoomCommand::Info { reply }).await
    }
}

/// The room actor. Runs inside a tokio task until every handle drops.
struct RoomEntity {
    room_hash: RoomHash,
    config: RoomConfig,
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomEntity {
    async fn run(mut self) {
        tracing::debug!(room = %self.room_hash, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Create { requested, reply } => {
                    let _ = reply.send(self.handle_create(requested));
                }
                RoomCommand::Join { nickname, reply } => {
                    let _ = reply.send(self.handle_join(nickname));
                }
                RoomCommand::Send { member_id, sender, content, reply } => {
                    let _ = reply.send(self.handle_send(member_id, sender, content));
                }
                RoomCommand::Poll { since, reply } => {
                    let _ = reply.send(self.handle_poll(since));
                }
                RoomCommand::Leave { member_id, reply } => {
                    let _ = reply.send(self.handle_leave(member_id));
                }
                RoomCommand::Info { reply } => {
                    let _ = reply.send(self.handle_info());
                }
            }
        }

        tracing::debug!(room = %self.room_hash, "room actor stopped");
    }

    /// Loads the live record, if any.
    ///
    /// Applies lazy expiry: a record past its TTL is deleted here and
    /// reported as absent, so expired data is never observable. Also
    /// rejects a record whose own hash disagrees with the storage key
    /// (a routing bug upstream).
    fn load(&self) -> Result<Option<Room>, RoomError> {
        let key = storage_key(&self.room_hash);
        let Some(bytes) = self.storage.get(&key)? else {
            return Ok(None);
        };

        let room: Room = serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::Corrupt(format!("room record: {e}")))?;

        if room.room_hash != self.room_hash {
            return Err(StorageError::Corrupt(format!(
                "record hash {} does not match key {}",
                room.room_hash, self.room_hash
            ))
            .into());
        }

        if room.is_expired(self.clock.now()) {
            self.storage.delete(&key)?;
            tracing::info!(room = %self.room_hash, "room expired, record deleted");
            return Ok(None);
        }

        Ok(Some(room))
    }

    /// Loads the live record or fails with `NotFound`.
    fn load_live(&self) -> Result<Room, RoomError> {
        self.load()?
            .ok_or_else(|| RoomError::NotFound(self.room_hash.clone()))
    }

    fn persist(&self, room: &Room) -> Result<(), RoomError> {
        let bytes = serde_json::to_vec(room)
            .map_err(|e| StorageError::Corrupt(format!("room record encode: {e}")))?;
        self.storage.put(&storage_key(&self.room_hash), &bytes)?;
        Ok(())
    }

    fn handle_create(&self, requested: Option<String>) -> Result<RoomCreated, RoomError> {
        if self.load()?.is_some() {
            return Err(RoomError::AlreadyExists(self.room_hash.clone()));
        }
        if requested.as_deref() != Some(self.room_hash.as_str()) {
            return Err(RoomError::InvalidInput(
                "payload room_hash does not match the requested room".into(),
            ));
        }

        let now = self.clock.now();
        let mut room = Room::new(self.room_hash.clone(), now, self.config.ttl.as_secs_f64());
        let member_id = generate_token(RoomConfig::MEMBER_ID_LEN);
        room.add_member(member_id.clone(), RoomConfig::CREATOR_NICKNAME.to_string());
        self.persist(&room)?;

        tracing::info!(room = %self.room_hash, expires_at = room.expires_at, "room created");

        Ok(RoomCreated {
            room_hash: room.room_hash.clone(),
            mode: room.mode,
            created_at: room.created_at,
            expires_at: room.expires_at,
            member_id,
            members: room.nicknames(),
        })
    }

    fn handle_join(&self, nickname: Option<String>) -> Result<RoomJoined, RoomError> {
        let mut room = self.load_live()?;

        let nickname = self.sanitize_nickname(nickname);
        let member_id = generate_token(RoomConfig::MEMBER_ID_LEN);
        room.add_member(member_id.clone(), nickname.clone());
        self.persist(&room)?;

        tracing::info!(
            room = %self.room_hash,
            %nickname,
            members = room.members.len(),
            "member joined"
        );

        Ok(RoomJoined {
            room_hash: room.room_hash.clone(),
            mode: room.mode,
            created_at: room.created_at,
            expires_at: room.expires_at,
            member_id,
            members: room.nicknames(),
            message_count: room.messages.len(),
            last_message_ts: room.last_message_ts(),
        })
    }

    fn handle_send(
        &self,
        member_id: Option<String>,
        sender: Option<String>,
        content: Option<String>,
    ) -> Result<MessageAck, RoomError> {
        let mut room = self.load_live()?;

        let content = match content {
            Some(c) if !c.is_empty() => c,
            _ => return Err(RoomError::InvalidInput("message content is required".into())),
        };

        // The stored nickname is authoritative when the member id is
        // known; otherwise fall back to the caller's sender string.
        let sender_name = member_id
            .as_deref()
            .and_then(|id| room.member_nickname(id))
            .map(str::to_string)
            .or(sender)
            .unwrap_or_else(|| RoomConfig::DEFAULT_NICKNAME.to_string());

        let msg = ChatMessage {
            id: generate_token(RoomConfig::MESSAGE_ID_LEN),
            sender: sender_name,
            content,
            timestamp: self.clock.now(),
        };
        let ack = MessageAck { id: msg.id.clone(), timestamp: msg.timestamp };

        room.push_message(msg, self.config.max_messages);
        self.persist(&room)?;

        tracing::debug!(
            room = %self.room_hash,
            messages = room.messages.len(),
            "message appended"
        );

        Ok(ack)
    }

    fn handle_poll(&self, since: f64) -> Result<PollResponse, RoomError> {
        let room = self.load_live()?;
        Ok(PollResponse {
            messages: room.messages_since(since),
            members: room.nicknames(),
            expires_at: room.expires_at,
            message_count: room.messages.len(),
        })
    }

    fn handle_leave(&self, member_id: Option<String>) -> Result<(), RoomError> {
        let mut room = self.load_live()?;

        if let Some(id) = member_id {
            if room.remove_member(&id) {
                self.persist(&room)?;
                tracing::info!(
                    room = %self.room_hash,
                    members = room.members.len(),
                    "member left"
                );
            }
        }
        // Unknown or absent member id: idempotent success.
        Ok(())
    }

    fn handle_info(&self) -> Result<RoomDetails, RoomError> {
        let room = self.load_live()?;
        Ok(RoomDetails {
            room_hash: room.room_hash.clone(),
            mode: room.mode,
            created_at: room.created_at,
            expires_at: room.expires_at,
            members: room.nicknames(),
            message_count: room.messages.len(),
            time_remaining: room.time_remaining(self.clock.now()),
        })
    }

    fn sanitize_nickname(&self, nickname: Option<String>) -> String {
        let raw = match nickname {
            Some(n) if !n.is_empty() => n,
            _ => return RoomConfig::DEFAULT_NICKNAME.to_string(),
        };
        raw.chars().take(self.config.nickname_max).collect()
    }
}

/// Spawns a room actor task and returns a handle to it.
///
/// `channel_size` bounds in-flight commands per room; senders wait when
/// it fills.
pub fn spawn_room(
    room_hash: RoomHash,
    config: RoomConfig,
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let entity = RoomEntity {
        room_hash: room_hash.clone(),
        config,
        storage,
        clock,
        receiver: rx,
    };

    tokio::spawn(entity.run());

    RoomHandle { room_hash, sender: tx }
}
