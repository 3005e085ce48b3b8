//! Identifiers for games and players.
//!
//! A game is identified by the chat it runs in plus the message that
//! announced it. A player is identified by the game plus the chat user.

use serde::{Deserialize, Serialize};

/// Chat user identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "User({})", self.0)
    }
}

/// Game identifier: `(chat_id, announcement_message_id)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId {
    pub chat_id: i64,
    pub message_id: i64,
}

impl GameId {
    #[must_use]
    pub const fn new(chat_id: i64, message_id: i64) -> Self {
        Self { chat_id, message_id }
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Game({}:{})", self.chat_id, self.message_id)
    }
}

/// Player identifier: a user within one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerKey {
    pub game: GameId,
    pub user: UserId,
}

impl PlayerKey {
    #[must_use]
    pub const fn new(game: GameId, user: UserId) -> Self {
        Self { game, user }
    }
}

impl std::fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.game, self.user)
    }
}

/// Milliseconds since the Unix epoch.
///
/// The engine never reads the clock itself; callers pass `now` in so
/// replays stay deterministic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Current wall-clock time. Hosts call this; the engine does not.
    #[must_use]
    pub fn now() -> Self {
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self(millis)
    }
}
