//! A game together with its players.
//!
//! `Arena` owns the grid and the player table of one game and is the only
//! place they are mutated. Callers must apply operations for one game one at
//! a time (see `host::GameHost`); separate arenas share nothing.

use log::info;
use rustc_hash::FxHashSet;

use super::game::Game;
use super::lifecycle::pick_spawn;
use super::player::{Player, PlayerColor, PlayerTable};
use crate::core::{
    Direction, EngineError, EngineResult, GameConfig, GameId, GameRng, GameRngState, PlayerKey, Timestamp, UserId,
};
use crate::movement::{apply_move, MoveOutcome};
use crate::visibility::{project, VisibleWindow};

/// Game state plus player table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arena {
    game: Game,
    players: PlayerTable,
}

impl Arena {
    /// Arena with no players yet.
    #[must_use]
    pub fn new(game: Game) -> Self {
        Self {
            game,
            players: PlayerTable::new(),
        }
    }

    /// Reassemble an arena from stored records.
    #[must_use]
    pub fn from_parts(game: Game, players: impl IntoIterator<Item = Player>) -> Self {
        Self {
            game,
            players: players.into_iter().collect(),
        }
    }

    /// Generate a fresh game.
    ///
    /// # Errors
    ///
    /// See [`Game::create`].
    pub fn create(id: GameId, config: GameConfig, rng: &mut GameRng, now: Timestamp) -> EngineResult<Self> {
        let game = Game::create(id, config, rng, now)?;
        info!("created {} ({}x{}, exit at {})", id, game.size(), game.size(), game.exit());
        Ok(Self::new(game))
    }

    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[must_use]
    pub fn players(&self) -> &PlayerTable {
        &self.players
    }

    #[must_use]
    pub fn player(&self, user: UserId) -> Option<&Player> {
        self.players.get(user)
    }

    pub fn into_parts(self) -> (Game, PlayerTable) {
        (self.game, self.players)
    }

    /// Persist the position of the game's drop-roll stream.
    pub fn set_rng_state(&mut self, state: GameRngState) {
        self.game.set_rng_state(state);
    }

    /// Add `user` to the game, or return their existing player.
    ///
    /// A user who left earlier gets their old record back with the first
    /// free color, keeping position and inventory.
    ///
    /// # Errors
    ///
    /// `GameAlreadyFinished` once the game has a winner.
    pub fn join(&mut self, user: UserId, rng: &mut GameRng, now: Timestamp) -> EngineResult<Player> {
        self.game.ensure_active()?;

        if let Some(existing) = self.players.get(user) {
            return Ok(existing.clone());
        }

        let color = PlayerColor::first_free(self.players.iter().map(|p| p.color));

        if let Some(index) = self.players.record_of(user) {
            let player = &mut self.players[index];
            player.has_left = false;
            player.color = color;
            info!("{} rejoined {} as {:?} at {}", user, self.game.id(), color, player.position);
            return Ok(player.clone());
        }

        let config = self.game.config();
        let taken: FxHashSet<_> = self.players.iter().map(|p| p.spawn_position).collect();
        let spawn = pick_spawn(self.game.grid(), &taken, config.spawn_attempts, rng);

        let player = Player::new(
            PlayerKey::new(self.game.id(), user),
            spawn,
            color,
            config.base_view_radius,
            config.starting_inventory,
            now,
        );
        info!("{} joined {} as {:?} at {}", user, self.game.id(), color, spawn);

        self.players.push(player.clone());
        Ok(player)
    }

    /// Mark `user` as gone, freeing their color.
    ///
    /// The record is kept with `has_left` set; the player no longer moves,
    /// blocks cells or shows up in views until they join again.
    ///
    /// # Errors
    ///
    /// `GameAlreadyFinished` once the game has a winner, `NotFound` if the
    /// user is not an active player.
    pub fn leave(&mut self, user: UserId) -> EngineResult<Player> {
        self.game.ensure_active()?;
        let index = self
            .players
            .index_of(user)
            .ok_or_else(|| EngineError::NotFound(format!("{} in {}", user, self.game.id())))?;

        self.players[index].has_left = true;
        info!("{} left {}", user, self.game.id());
        Ok(self.players[index].clone())
    }

    /// Move `user` one step. See [`crate::movement::apply_move`].
    ///
    /// # Errors
    ///
    /// `GameAlreadyFinished`, `NotFound` or `OutOfBounds`; state is untouched
    /// on error.
    pub fn apply_move(
        &mut self,
        user: UserId,
        direction: Direction,
        rng: &mut GameRng,
        now: Timestamp,
    ) -> EngineResult<MoveOutcome> {
        apply_move(&mut self.game, &mut self.players, user, direction, rng, now)
    }

    /// What `user` currently sees.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user never joined.
    pub fn view(&self, user: UserId) -> EngineResult<VisibleWindow> {
        let viewer = self
            .players
            .get(user)
            .ok_or_else(|| EngineError::NotFound(format!("{} in {}", user, self.game.id())))?;
        Ok(project(&self.game, viewer, self.players.iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Coordinate, MazeConfig};
    use crate::maze::{CellType, MazeGrid};

    fn open_arena() -> Arena {
        let grid = MazeGrid::new(9, CellType::Path);
        let game = Game::from_grid(
            GameId::new(1, 1),
            GameConfig::default(),
            grid,
            Coordinate::new(4, 4),
            1,
            Timestamp(0),
        )
        .unwrap();
        Arena::new(game)
    }

    #[test]
    fn test_join_assigns_distinct_colors_and_spawns() {
        let mut arena = open_arena();
        let mut rng = GameRng::new(2);

        let a = arena.join(UserId(1), &mut rng, Timestamp(1)).unwrap();
        let b = arena.join(UserId(2), &mut rng, Timestamp(2)).unwrap();

        assert_eq!(a.color, PlayerColor::Red);
        assert_eq!(b.color, PlayerColor::Blue);
        assert_ne!(a.spawn_position, b.spawn_position);
        assert_eq!(a.position, a.spawn_position);
        assert!(a.spawn_position.is_boundary(9));
        assert_eq!(b.joined_at, Timestamp(2));
        assert_eq!(arena.players().len(), 2);
    }

    #[test]
    fn test_rejoin_returns_existing() {
        let mut arena = open_arena();
        let mut rng = GameRng::new(2);

        let first = arena.join(UserId(1), &mut rng, Timestamp(1)).unwrap();
        let again = arena.join(UserId(1), &mut rng, Timestamp(5)).unwrap();

        assert_eq!(first, again);
        assert_eq!(arena.players().len(), 1);
    }

    #[test]
    fn test_leave_frees_color() {
        let mut arena = open_arena();
        let mut rng = GameRng::new(2);

        arena.join(UserId(1), &mut rng, Timestamp(1)).unwrap();
        arena.join(UserId(2), &mut rng, Timestamp(1)).unwrap();
        let left = arena.leave(UserId(1)).unwrap();
        assert_eq!(left.color, PlayerColor::Red);

        assert!(left.has_left);
        assert!(arena.player(UserId(1)).is_none());
        assert_eq!(arena.players().len(), 1);

        let c = arena.join(UserId(3), &mut rng, Timestamp(1)).unwrap();
        assert_eq!(c.color, PlayerColor::Red);
        assert!(matches!(arena.leave(UserId(99)), Err(EngineError::NotFound(_))));
        assert!(matches!(arena.leave(UserId(1)), Err(EngineError::NotFound(_))));
    }

    #[test]
    fn test_rejoin_after_leave_restores_record() {
        let mut arena = open_arena();
        let mut rng = GameRng::new(2);

        let first = arena.join(UserId(1), &mut rng, Timestamp(1)).unwrap();
        arena.join(UserId(2), &mut rng, Timestamp(1)).unwrap();
        arena.leave(UserId(1)).unwrap();
        assert!(matches!(
            arena.apply_move(UserId(1), Direction::Down, &mut rng, Timestamp(2)),
            Err(EngineError::NotFound(_))
        ));

        let back = arena.join(UserId(1), &mut rng, Timestamp(3)).unwrap();
        assert!(!back.has_left);
        assert_eq!(back.position, first.position);
        assert_eq!(back.joined_at, first.joined_at);
        assert_eq!(back.color, PlayerColor::Red);
        assert_eq!(arena.players().len(), 2);
    }

    #[test]
    fn test_palette_exhaustion_reuses_first_color() {
        let mut arena = open_arena();
        let mut rng = GameRng::new(2);

        for user in 0..PlayerColor::PALETTE.len() as i64 {
            arena.join(UserId(user), &mut rng, Timestamp(0)).unwrap();
        }
        let extra = arena.join(UserId(100), &mut rng, Timestamp(0)).unwrap();
        assert_eq!(extra.color, PlayerColor::Red);
    }

    #[test]
    fn test_generated_arena_spawns_on_path() {
        let config = GameConfig::new(MazeConfig::sized(31));
        let mut rng = GameRng::new(8);
        let mut arena = Arena::create(GameId::new(2, 2), config, &mut rng, Timestamp(0)).unwrap();

        for user in 0..5 {
            let p = arena.join(UserId(user), &mut rng, Timestamp(0)).unwrap();
            assert_eq!(arena.game().grid()[p.position], CellType::Path);
        }
    }

    #[test]
    fn test_view_requires_player() {
        let arena = open_arena();
        assert!(matches!(arena.view(UserId(1)), Err(EngineError::NotFound(_))));
    }
}
