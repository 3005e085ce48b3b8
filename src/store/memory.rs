//! In-memory `GameStore`.
//!
//! Records are kept bincode-encoded, so every load hands back an independent
//! copy and every save replaces a whole record at once, the same contract a
//! database-backed store gives.

use std::sync::{Mutex, MutexGuard};

use rustc_hash::FxHashMap;
use serde::{de::DeserializeOwned, Serialize};

use super::GameStore;
use crate::core::{EngineResult, GameId, PlayerKey, Timestamp};
use crate::game::{Game, Player};

#[derive(Default)]
struct Tables {
    games: FxHashMap<GameId, GameRow>,
    players: FxHashMap<PlayerKey, PlayerRow>,
}

struct GameRow {
    created_at: Timestamp,
    finished: bool,
    bytes: Vec<u8>,
}

struct PlayerRow {
    joined_at: Timestamp,
    bytes: Vec<u8>,
}

/// Thread-safe in-memory record store.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        // A panic mid-write cannot leave a half-written row: rows are
        // replaced whole.
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn encode<T: Serialize>(value: &T) -> EngineResult<Vec<u8>> {
    Ok(bincode::serialize(value)?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> EngineResult<T> {
    Ok(bincode::deserialize(bytes)?)
}

impl GameStore for MemoryStore {
    fn load_game(&self, id: GameId) -> EngineResult<Option<Game>> {
        self.tables()
            .games
            .get(&id)
            .map(|row| decode(&row.bytes))
            .transpose()
    }

    fn save_game(&self, game: &Game) -> EngineResult<()> {
        let row = GameRow {
            created_at: game.created_at(),
            finished: game.is_finished(),
            bytes: encode(game)?,
        };
        self.tables().games.insert(game.id(), row);
        Ok(())
    }

    fn load_player(&self, key: PlayerKey) -> EngineResult<Option<Player>> {
        self.tables()
            .players
            .get(&key)
            .map(|row| decode(&row.bytes))
            .transpose()
    }

    fn save_player(&self, player: &Player) -> EngineResult<()> {
        let row = PlayerRow {
            joined_at: player.joined_at,
            bytes: encode(player)?,
        };
        self.tables().players.insert(player.key, row);
        Ok(())
    }

    fn list_players(&self, game: GameId) -> EngineResult<Vec<Player>> {
        let tables = self.tables();
        let mut rows: Vec<(&PlayerKey, &PlayerRow)> = tables
            .players
            .iter()
            .filter(|(key, _)| key.game == game)
            .collect();
        rows.sort_by_key(|(key, row)| (row.joined_at, key.user));
        let players: EngineResult<Vec<Player>> = rows.into_iter().map(|(_, row)| decode(&row.bytes)).collect();
        players
    }

    fn latest_active_game(&self, chat_id: i64) -> EngineResult<Option<GameId>> {
        let tables = self.tables();
        let latest = tables
            .games
            .iter()
            .filter(|(id, row)| id.chat_id == chat_id && !row.finished)
            .max_by_key(|(id, row)| (row.created_at, id.message_id))
            .map(|(id, _)| *id);
        Ok(latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Coordinate, GameConfig, UserId};
    use crate::game::{Inventory, PlayerColor};
    use crate::maze::{CellType, MazeGrid};

    fn game(chat: i64, message: i64, created: u64) -> Game {
        Game::from_grid(
            GameId::new(chat, message),
            GameConfig::default(),
            MazeGrid::new(5, CellType::Path),
            Coordinate::new(2, 2),
            1,
            Timestamp(created),
        )
        .unwrap()
    }

    fn player(game: GameId, user: i64, joined: u64) -> Player {
        Player::new(
            PlayerKey::new(game, UserId(user)),
            Coordinate::new(0, 0),
            PlayerColor::Blue,
            3,
            Inventory::default(),
            Timestamp(joined),
        )
    }

    #[test]
    fn test_game_roundtrip() {
        let store = MemoryStore::new();
        let g = game(1, 1, 0);

        assert!(store.load_game(g.id()).unwrap().is_none());
        store.save_game(&g).unwrap();
        assert_eq!(store.load_game(g.id()).unwrap(), Some(g));
    }

    #[test]
    fn test_players_listed_in_join_order() {
        let store = MemoryStore::new();
        let id = GameId::new(1, 1);
        store.save_player(&player(id, 30, 5)).unwrap();
        store.save_player(&player(id, 10, 7)).unwrap();
        store.save_player(&player(id, 20, 1)).unwrap();
        store.save_player(&player(GameId::new(2, 2), 40, 0)).unwrap();

        let users: Vec<_> = store.list_players(id).unwrap().iter().map(|p| p.user()).collect();
        assert_eq!(users, vec![UserId(20), UserId(30), UserId(10)]);
    }

    #[test]
    fn test_save_player_replaces_record() {
        let store = MemoryStore::new();
        let mut p = player(GameId::new(1, 1), 1, 0);
        store.save_player(&p).unwrap();
        assert_eq!(store.load_player(p.key).unwrap(), Some(p.clone()));

        p.has_left = true;
        store.save_player(&p).unwrap();
        assert_eq!(store.load_player(p.key).unwrap(), Some(p.clone()));
        assert_eq!(store.list_players(p.key.game).unwrap().len(), 1);
    }

    #[test]
    fn test_latest_active_game() {
        let store = MemoryStore::new();
        store.save_game(&game(1, 10, 100)).unwrap();
        store.save_game(&game(1, 11, 200)).unwrap();
        store.save_game(&game(2, 12, 300)).unwrap();

        assert_eq!(store.latest_active_game(1).unwrap(), Some(GameId::new(1, 11)));
        assert_eq!(store.latest_active_game(3).unwrap(), None);
    }
}
