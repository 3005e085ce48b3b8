//! Persistence collaborator.
//!
//! The engine reads and writes whole records through `GameStore`. Backends
//! must make each single-record write atomic; cross-record consistency for
//! one game comes from `host::GameHost` serializing all work on that game.

pub mod memory;

pub use memory::MemoryStore;

use crate::core::{EngineResult, GameId, PlayerKey};
use crate::game::{Game, Player};

/// Record storage for games and players.
pub trait GameStore: Send + Sync {
    /// Load a game record, `None` if unknown.
    fn load_game(&self, id: GameId) -> EngineResult<Option<Game>>;

    /// Insert or replace a game record.
    fn save_game(&self, game: &Game) -> EngineResult<()>;

    /// Load one player record, `None` if unknown.
    fn load_player(&self, key: PlayerKey) -> EngineResult<Option<Player>>;

    /// Insert or replace a player record.
    fn save_player(&self, player: &Player) -> EngineResult<()>;

    /// Every player record of a game, including players who left, in join
    /// order.
    fn list_players(&self, game: GameId) -> EngineResult<Vec<Player>>;

    /// Most recently created unfinished game in a chat.
    fn latest_active_game(&self, chat_id: i64) -> EngineResult<Option<GameId>>;
}
