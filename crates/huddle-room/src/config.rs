//! Room configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for room entities.
///
/// One config is shared by every room spawned from the same registry.
/// Defaults carry the production constants; tests shrink them to cross
/// boundaries quickly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// How long a room lives after creation.
    pub ttl: Duration,

    /// Retained-message cap. Appending past the cap drops the oldest
    /// messages first.
    pub max_messages: usize,

    /// Maximum nickname length, in characters. Longer names are
    /// truncated, not rejected.
    pub nickname_max: usize,
}

impl RoomConfig {
    /// Nickname used when a joiner supplies none.
    pub const DEFAULT_NICKNAME: &'static str = "anon";

    /// Nickname assigned to the member minted by `create`.
    pub const CREATOR_NICKNAME: &'static str = "creator";

    /// Length of generated member ids.
    pub const MEMBER_ID_LEN: usize = 8;

    /// Length of generated message ids.
    pub const MESSAGE_ID_LEN: usize = 12;
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
            max_messages: 500,
            nickname_max: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_config_default() {
        let config = RoomConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(3600));
        assert_eq!(config.max_messages, 500);
        assert_eq!(config.nickname_max, 20);
    }
}
