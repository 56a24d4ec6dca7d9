//! Integration tests for the room entity, driven by an in-memory store
//! and a manually advanced clock.

use std::sync::Arc;
use std::time::Duration;

use huddle_protocol::RoomHash;
use huddle_room::{RoomConfig, RoomError, RoomRegistry};
use huddle_store::{ManualClock, MemoryStorage};

const HASH: &str = "abcdef0123456789";
const START: f64 = 1_700_000_000.0;

struct Fixture {
    registry: RoomRegistry,
    clock: Arc<ManualClock>,
    storage: Arc<MemoryStorage>,
}

fn fixture() -> Fixture {
    fixture_with(RoomConfig::default())
}

fn fixture_with(config: RoomConfig) -> Fixture {
    let clock = Arc::new(ManualClock::new(START));
    let storage = Arc::new(MemoryStorage::new());
    let registry = RoomRegistry::new(
        config,
        Arc::clone(&storage) as Arc<dyn huddle_store::Storage>,
        Arc::clone(&clock) as Arc<dyn huddle_store::Clock>,
    );
    Fixture { registry, clock, storage }
}

fn hash() -> RoomHash {
    RoomHash::parse(HASH).unwrap()
}

// =========================================================================
// create
// =========================================================================

#[tokio::test]
async fn test_create_returns_creator_membership() {
    let fx = fixture();
    let room = fx.registry.handle(&hash());

    let created = room.create(Some(HASH.into())).await.unwrap();

    assert_eq!(created.room_hash.as_str(), HASH);
    assert_eq!(created.created_at, START);
    assert_eq!(created.expires_at, START + 3600.0);
    assert_eq!(created.member_id.len(), 8);
    assert_eq!(created.members, ["creator"]);
}

#[tokio::test]
async fn test_create_twice_conflicts() {
    let fx = fixture();
    let room = fx.registry.handle(&hash());
    room.create(Some(HASH.into())).await.unwrap();

    let err = room.create(Some(HASH.into())).await.unwrap_err();
    assert!(matches!(err, RoomError::AlreadyExists(_)));
}

#[tokio::test]
async fn test_create_rejects_mismatched_payload_hash() {
    let fx = fixture();
    let room = fx.registry.handle(&hash());

    let err = room.create(Some("ffffffffffffffff".into())).await.unwrap_err();
    assert!(matches!(err, RoomError::InvalidInput(_)));

    let err = room.create(None).await.unwrap_err();
    assert!(matches!(err, RoomError::InvalidInput(_)));
}

// =========================================================================
// join
// =========================================================================

#[tokio::test]
async fn test_join_missing_room_not_found() {
    let fx = fixture();
    let room = fx.registry.handle(&hash());
    let err = room.join(None).await.unwrap_err();
    assert!(matches!(err, RoomError::NotFound(_)));
}

#[tokio::test]
async fn test_join_defaults_nickname_to_anon() {
    let fx = fixture();
    let room = fx.registry.handle(&hash());
    room.create(Some(HASH.into())).await.unwrap();

    let joined = room.join(None).await.unwrap();
    assert_eq!(joined.members, ["creator", "anon"]);
    assert_eq!(joined.message_count, 0);
    assert_eq!(joined.last_message_ts, 0.0);
}

#[tokio::test]
async fn test_join_truncates_long_nickname() {
    let fx = fixture();
    let room = fx.registry.handle(&hash());
    room.create(Some(HASH.into())).await.unwrap();

    let joined = room
        .join(Some("abcdefghijklmnopqrstuvwxyz".into()))
        .await
        .unwrap();
    assert_eq!(joined.members[1], "abcdefghijklmnopqrst");
}

#[tokio::test]
async fn test_join_reports_latest_message_timestamp() {
    let fx = fixture();
    let room = fx.registry.handle(&hash());
    room.create(Some(HASH.into())).await.unwrap();

    fx.clock.advance(5.0);
    room.send(None, None, Some("hi".into())).await.unwrap();

    let joined = room.join(Some("late".into())).await.unwrap();
    assert_eq!(joined.message_count, 1);
    assert_eq!(joined.last_message_ts, START + 5.0);
}

// =========================================================================
// send
// =========================================================================

#[tokio::test]
async fn test_send_requires_content() {
    let fx = fixture();
    let room = fx.registry.handle(&hash());
    room.create(Some(HASH.into())).await.unwrap();

    let err = room.send(None, None, None).await.unwrap_err();
    assert!(matches!(err, RoomError::InvalidInput(_)));
    let err = room.send(None, None, Some(String::new())).await.unwrap_err();
    assert!(matches!(err, RoomError::InvalidInput(_)));
}

#[tokio::test]
async fn test_send_resolves_sender_precedence() {
    let fx = fixture();
    let room = fx.registry.handle(&hash());
    let created = room.create(Some(HASH.into())).await.unwrap();

    // Known member id: stored nickname wins over the supplied sender.
    room.send(
        Some(created.member_id.clone()),
        Some("impostor".into()),
        Some("one".into()),
    )
    .await
    .unwrap();
    // Unknown member id: fall back to the supplied sender.
    room.send(Some("zzzzzzzz".into()), Some("guest".into()), Some("two".into()))
        .await
        .unwrap();
    // Nothing at all: "anon".
    room.send(None, None, Some("three".into())).await.unwrap();

    let poll = room.poll(0.0).await.unwrap();
    let senders: Vec<_> = poll.messages.iter().map(|m| m.sender.as_str()).collect();
    assert_eq!(senders, ["creator", "guest", "anon"]);
}

#[tokio::test]
async fn test_send_past_cap_keeps_most_recent_in_order() {
    let fx = fixture_with(RoomConfig { max_messages: 500, ..RoomConfig::default() });
    let room = fx.registry.handle(&hash());
    room.create(Some(HASH.into())).await.unwrap();

    for i in 0..501 {
        fx.clock.advance(0.001);
        room.send(None, None, Some(format!("msg-{i}"))).await.unwrap();
    }

    let poll = room.poll(0.0).await.unwrap();
    assert_eq!(poll.message_count, 500);
    assert_eq!(poll.messages.len(), 500);
    // The first of the 501 is gone; relative order is unchanged.
    assert_eq!(poll.messages[0].content, "msg-1");
    assert_eq!(poll.messages[499].content, "msg-500");
}

// =========================================================================
// poll
// =========================================================================

#[tokio::test]
async fn test_poll_since_is_strictly_exclusive() {
    let fx = fixture();
    let room = fx.registry.handle(&hash());
    room.create(Some(HASH.into())).await.unwrap();

    fx.clock.advance(1.0);
    let first = room.send(None, None, Some("a".into())).await.unwrap();
    fx.clock.advance(1.0);
    room.send(None, None, Some("b".into())).await.unwrap();

    let poll = room.poll(first.timestamp).await.unwrap();
    assert_eq!(poll.messages.len(), 1);
    assert_eq!(poll.messages[0].content, "b");
    assert!(poll.messages.iter().all(|m| m.timestamp > first.timestamp));

    // since=0 returns everything retained.
    assert_eq!(room.poll(0.0).await.unwrap().messages.len(), 2);
}

#[tokio::test]
async fn test_poll_missing_room_not_found() {
    let fx = fixture();
    let room = fx.registry.handle(&hash());
    let err = room.poll(0.0).await.unwrap_err();
    assert!(matches!(err, RoomError::NotFound(_)));
}

// =========================================================================
// leave
// =========================================================================

#[tokio::test]
async fn test_leave_removes_member() {
    let fx = fixture();
    let room = fx.registry.handle(&hash());
    room.create(Some(HASH.into())).await.unwrap();
    let joined = room.join(Some("kit".into())).await.unwrap();

    room.leave(Some(joined.member_id)).await.unwrap();

    let info = room.info().await.unwrap();
    assert_eq!(info.members, ["creator"]);
}

#[tokio::test]
async fn test_leave_is_idempotent_for_unknown_member() {
    let fx = fixture();
    let room = fx.registry.handle(&hash());
    room.create(Some(HASH.into())).await.unwrap();

    room.leave(Some("nobody99".into())).await.unwrap();
    room.leave(Some("nobody99".into())).await.unwrap();
    room.leave(None).await.unwrap();
}

// =========================================================================
// info
// =========================================================================

#[tokio::test]
async fn test_info_reports_floored_time_remaining() {
    let fx = fixture();
    let room = fx.registry.handle(&hash());
    room.create(Some(HASH.into())).await.unwrap();

    fx.clock.advance(10.5);
    let info = room.info().await.unwrap();
    assert_eq!(info.time_remaining, 3589);
    assert_eq!(info.message_count, 0);
    assert_eq!(info.members, ["creator"]);
}

// =========================================================================
// TTL expiry
// =========================================================================

#[tokio::test]
async fn test_expired_room_behaves_as_never_created() {
    let fx = fixture();
    let room = fx.registry.handle(&hash());
    room.create(Some(HASH.into())).await.unwrap();

    fx.clock.advance(3600.1);

    assert!(matches!(room.info().await.unwrap_err(), RoomError::NotFound(_)));
    assert!(matches!(room.poll(0.0).await.unwrap_err(), RoomError::NotFound(_)));
    assert!(matches!(
        room.send(None, None, Some("hi".into())).await.unwrap_err(),
        RoomError::NotFound(_)
    ));
    assert!(matches!(room.join(None).await.unwrap_err(), RoomError::NotFound(_)));

    // First access after expiry deleted the record; it must not come
    // back on a later read.
    assert!(fx.storage.is_empty());
    assert!(matches!(room.info().await.unwrap_err(), RoomError::NotFound(_)));
}

#[tokio::test]
async fn test_room_is_live_at_exact_expiry_instant() {
    let fx = fixture();
    let room = fx.registry.handle(&hash());
    room.create(Some(HASH.into())).await.unwrap();

    // expires_at itself is still inside the window (now > expires_at).
    fx.clock.set(START + 3600.0);
    assert!(room.info().await.is_ok());
}

#[tokio::test]
async fn test_create_after_expiry_starts_a_fresh_room() {
    let fx = fixture();
    let room = fx.registry.handle(&hash());
    room.create(Some(HASH.into())).await.unwrap();
    room.send(None, None, Some("old".into())).await.unwrap();

    fx.clock.advance(4000.0);

    let created = room.create(Some(HASH.into())).await.unwrap();
    assert_eq!(created.created_at, START + 4000.0);
    let poll = room.poll(0.0).await.unwrap();
    assert!(poll.messages.is_empty(), "old messages must not resurrect");
}

#[tokio::test]
async fn test_short_ttl_config_is_honored() {
    let fx = fixture_with(RoomConfig {
        ttl: Duration::from_secs(10),
        ..RoomConfig::default()
    });
    let room = fx.registry.handle(&hash());

    let created = room.create(Some(HASH.into())).await.unwrap();
    assert_eq!(created.expires_at, START + 10.0);

    fx.clock.advance(11.0);
    assert!(matches!(room.info().await.unwrap_err(), RoomError::NotFound(_)));
}
