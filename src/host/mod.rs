//! Serialized entry point for hosts.
//!
//! `GameHost` runs every operation on a game under that game's own mutex:
//! load the records, apply the change to an `Arena`, write the changed
//! records back. Operations on different games never wait on each other.
//!
//! ```
//! use maze_engine::core::{Direction, GameConfig, MazeConfig, Timestamp, UserId};
//! use maze_engine::host::GameHost;
//! use maze_engine::store::MemoryStore;
//!
//! let host = GameHost::new(MemoryStore::new(), GameConfig::new(MazeConfig::sized(31)), 7);
//! let game = host.create_game(-100, 1, Timestamp(0)).unwrap();
//! host.join(game.id(), UserId(1), Timestamp(1)).unwrap();
//! let _ = host.move_player(game.id(), UserId(1), Direction::Down, Timestamp(2));
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;
use rustc_hash::FxHashMap;

use crate::core::{Direction, EngineError, EngineResult, GameConfig, GameId, GameRng, Timestamp, UserId};
use crate::game::{Arena, Game, Player};
use crate::movement::MoveOutcome;
use crate::store::GameStore;
use crate::visibility::VisibleWindow;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Per-game serializing front end over a `GameStore`.
pub struct GameHost<S> {
    store: S,
    config: GameConfig,
    seeds: Mutex<GameRng>,
    locks: Mutex<FxHashMap<GameId, Arc<Mutex<()>>>>,
}

impl<S: GameStore> GameHost<S> {
    /// New host. `seed` drives the seeds of every game it creates.
    pub fn new(store: S, config: GameConfig, seed: u64) -> Self {
        Self {
            store,
            config,
            seeds: Mutex::new(GameRng::new(seed)),
            locks: Mutex::new(FxHashMap::default()),
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Run `op` while holding the mutex for `id`.
    ///
    /// Registry entries exist only while some caller holds or waits on them,
    /// so unknown or finished ids never accumulate. Every caller clones the
    /// entry under the registry lock, which makes the strong count checked
    /// in `release` exact.
    fn serialized<T>(&self, id: GameId, op: impl FnOnce() -> EngineResult<T>) -> EngineResult<T> {
        let game_lock = Arc::clone(lock(&self.locks).entry(id).or_default());
        let result = {
            let _guard = lock(&game_lock);
            op()
        };
        self.release(id, game_lock);
        result
    }

    fn release(&self, id: GameId, game_lock: Arc<Mutex<()>>) {
        let mut locks = lock(&self.locks);
        // One count for the registry, one for `game_lock`.
        if Arc::strong_count(&game_lock) == 2 {
            locks.remove(&id);
        }
    }

    fn load_arena(&self, id: GameId) -> EngineResult<Arena> {
        let game = self
            .store
            .load_game(id)?
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        let players = self.store.list_players(id)?;
        Ok(Arena::from_parts(game, players))
    }

    /// Generate and store a new game announced by `message_id` in `chat_id`.
    ///
    /// # Errors
    ///
    /// Generation errors, or store errors while saving.
    pub fn create_game(&self, chat_id: i64, message_id: i64, now: Timestamp) -> EngineResult<Game> {
        let id = GameId::new(chat_id, message_id);
        self.serialized(id, || {
            let seed = lock(&self.seeds).next_seed();
            let arena = Arena::create(id, self.config.clone(), &mut GameRng::new(seed), now)?;
            self.store.save_game(arena.game())?;

            let (game, _) = arena.into_parts();
            Ok(game)
        })
    }

    /// Add `user` to game `id`.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown game, `GameAlreadyFinished`, store errors.
    pub fn join(&self, id: GameId, user: UserId, now: Timestamp) -> EngineResult<Player> {
        self.serialized(id, || {
            let mut arena = self.load_arena(id)?;
            let mut rng = GameRng::from_state(arena.game().rng_state());
            let player = arena.join(user, &mut rng, now)?;
            arena.set_rng_state(rng.state());

            self.store.save_player(&player)?;
            self.store.save_game(arena.game())?;
            Ok(player)
        })
    }

    /// Mark `user` as having left game `id`. The record stays in the store.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown game or user, `GameAlreadyFinished`, store errors.
    pub fn leave(&self, id: GameId, user: UserId) -> EngineResult<Player> {
        self.serialized(id, || {
            let mut arena = self.load_arena(id)?;
            let player = arena.leave(user)?;
            self.store.save_player(&player)?;
            Ok(player)
        })
    }

    /// Apply one move and persist the mover, any defender and the game.
    ///
    /// Player records are written before the game record. A failed player
    /// write therefore leaves the stored grid and drop stream untouched.
    ///
    /// # Errors
    ///
    /// `NotFound`, `GameAlreadyFinished`, `OutOfBounds`, store errors.
    /// Nothing is written when the move itself fails.
    pub fn move_player(
        &self,
        id: GameId,
        user: UserId,
        direction: Direction,
        now: Timestamp,
    ) -> EngineResult<MoveOutcome> {
        self.serialized(id, || {
            let mut arena = self.load_arena(id)?;
            let mut rng = GameRng::from_state(arena.game().rng_state());
            let outcome = arena.apply_move(user, direction, &mut rng, now)?;
            arena.set_rng_state(rng.state());

            let touched = match outcome {
                MoveOutcome::CombatWin { defender } | MoveOutcome::CombatBlocked { defender } => vec![user, defender],
                _ => vec![user],
            };
            for changed in touched {
                if let Some(player) = arena.player(changed) {
                    self.store.save_player(player)?;
                }
            }
            self.store.save_game(arena.game())?;

            debug!("host applied {:?} for {} in {}", outcome, user, id);
            Ok(outcome)
        })
    }

    /// Current view for `user` in game `id`.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown game or user, store errors.
    pub fn view(&self, id: GameId, user: UserId) -> EngineResult<VisibleWindow> {
        self.serialized(id, || self.load_arena(id)?.view(user))
    }

    /// Consistent copy of a game and its players, e.g. for full-map rendering.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown game, store errors.
    pub fn snapshot(&self, id: GameId) -> EngineResult<Arena> {
        self.serialized(id, || self.load_arena(id))
    }

    /// Most recent unfinished game in `chat_id`.
    ///
    /// # Errors
    ///
    /// Store errors.
    pub fn active_game(&self, chat_id: i64) -> EngineResult<Option<GameId>> {
        self.store.latest_active_game(chat_id)
    }
}

#[cfg(test)]
impl<S> GameHost<S> {
    fn tracked_games(&self) -> usize {
        lock(&self.locks).len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::core::{Coordinate, MazeConfig, PlayerKey};
    use crate::game::{Inventory, PlayerColor};
    use crate::maze::{CellType, MazeGrid};
    use crate::store::MemoryStore;

    fn host() -> GameHost<MemoryStore> {
        GameHost::new(MemoryStore::new(), GameConfig::new(MazeConfig::sized(31)), 3)
    }

    /// Store whose player writes can be switched to fail.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_players: AtomicBool,
    }

    impl GameStore for FlakyStore {
        fn load_game(&self, id: GameId) -> EngineResult<Option<Game>> {
            self.inner.load_game(id)
        }

        fn save_game(&self, game: &Game) -> EngineResult<()> {
            self.inner.save_game(game)
        }

        fn load_player(&self, key: PlayerKey) -> EngineResult<Option<Player>> {
            self.inner.load_player(key)
        }

        fn save_player(&self, player: &Player) -> EngineResult<()> {
            if self.fail_players.load(Ordering::SeqCst) {
                return Err(EngineError::NotFound("player table offline".to_string()));
            }
            self.inner.save_player(player)
        }

        fn list_players(&self, game: GameId) -> EngineResult<Vec<Player>> {
            self.inner.list_players(game)
        }

        fn latest_active_game(&self, chat_id: i64) -> EngineResult<Option<GameId>> {
            self.inner.latest_active_game(chat_id)
        }
    }

    #[test]
    fn test_unknown_ids_leave_no_lock_entries() {
        let host = host();
        for message in 0..1000 {
            let id = GameId::new(-5, message);
            let err = host.move_player(id, UserId(1), Direction::Up, Timestamp(0)).unwrap_err();
            assert!(matches!(err, EngineError::NotFound(_)));
        }
        assert_eq!(host.tracked_games(), 0);
    }

    #[test]
    fn test_lock_entry_lives_only_during_operation() {
        let host = host();
        let game = host.create_game(1, 1, Timestamp(0)).unwrap();
        host.join(game.id(), UserId(1), Timestamp(0)).unwrap();
        let _ = host.move_player(game.id(), UserId(1), Direction::Down, Timestamp(1));
        host.view(game.id(), UserId(1)).unwrap();
        assert_eq!(host.tracked_games(), 0);

        let seen = host.serialized(game.id(), || Ok(host.tracked_games())).unwrap();
        assert_eq!(seen, 1);
        assert_eq!(host.tracked_games(), 0);
    }

    #[test]
    fn test_unknown_game() {
        let host = host();
        let err = host.join(GameId::new(9, 9), UserId(1), Timestamp(0)).unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn test_join_persists() {
        let host = host();
        let game = host.create_game(1, 1, Timestamp(0)).unwrap();
        let player = host.join(game.id(), UserId(5), Timestamp(1)).unwrap();

        let stored = host.store().load_player(player.key).unwrap();
        assert_eq!(stored, Some(player));
        assert_eq!(host.active_game(1).unwrap(), Some(game.id()));
    }

    #[test]
    fn test_join_advances_stored_rng() {
        let host = host();
        let game = host.create_game(1, 1, Timestamp(0)).unwrap();
        host.join(game.id(), UserId(5), Timestamp(1)).unwrap();

        let stored = host.store().load_game(game.id()).unwrap().unwrap();
        assert_ne!(stored.rng_state(), game.rng_state());
    }

    #[test]
    fn test_leave_keeps_record() {
        let host = host();
        let game = host.create_game(1, 1, Timestamp(0)).unwrap();
        let player = host.join(game.id(), UserId(5), Timestamp(1)).unwrap();

        host.leave(game.id(), UserId(5)).unwrap();
        let stored = host.store().load_player(player.key).unwrap().unwrap();
        assert!(stored.has_left);
        assert_eq!(stored.inventory, player.inventory);
        assert_eq!(host.store().list_players(game.id()).unwrap().len(), 1);
        assert!(host.snapshot(game.id()).unwrap().players().is_empty());
    }

    #[test]
    fn test_failed_player_write_leaves_game_untouched() {
        let host = GameHost::new(FlakyStore::default(), GameConfig::default(), 1);
        let id = GameId::new(4, 4);
        let grid = MazeGrid::from_rows(&["...", ".C.", "..."]).unwrap();
        let game = Game::from_grid(id, GameConfig::default(), grid, Coordinate::new(2, 2), 8, Timestamp(0)).unwrap();
        host.store().save_game(&game).unwrap();
        let mover = Player::new(
            PlayerKey::new(id, UserId(1)),
            Coordinate::new(1, 0),
            PlayerColor::Red,
            2,
            Inventory::default(),
            Timestamp(0),
        );
        host.store().save_player(&mover).unwrap();

        host.store().fail_players.store(true, Ordering::SeqCst);
        assert!(host.move_player(id, UserId(1), Direction::Right, Timestamp(1)).is_err());

        assert_eq!(host.store().load_game(id).unwrap(), Some(game));
        assert_eq!(host.store().load_player(mover.key).unwrap(), Some(mover));
    }
}
