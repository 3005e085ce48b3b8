//! Game records.
//!
//! A game moves `Active -> Finished` exactly once, when a player lands on
//! the exit anchor. Creation generates the maze synchronously, so there is
//! no observable state before `Active`.

use serde::{Deserialize, Serialize};

use crate::core::{
    Coordinate, EngineError, EngineResult, GameConfig, GameId, GameRng, GameRngState, Timestamp, UserId,
};
use crate::maze::{MazeGenerator, MazeGrid};

/// Lifecycle state of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Accepting joins and moves.
    Active,
    /// Someone reached the exit. Terminal.
    Finished,
}

/// One maze game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    id: GameId,
    config: GameConfig,
    grid: MazeGrid,
    exit: Coordinate,
    created_at: Timestamp,
    winner: Option<UserId>,
    /// Stream for chest drops, persisted with the record.
    rng_state: GameRngState,
}

impl Game {
    /// Generate a new maze and wrap it in an active game.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for an unusable maze configuration,
    /// `GenerationExhausted` when a `min_solution_length` cannot be met.
    pub fn create(id: GameId, config: GameConfig, rng: &mut GameRng, now: Timestamp) -> EngineResult<Self> {
        let generator = MazeGenerator::new(config.maze.clone())?;
        let maze = generator.generate_with_retries(rng)?;
        let drops = rng.for_context("drops");

        Ok(Self {
            id,
            config,
            grid: maze.grid,
            exit: maze.exit,
            created_at: now,
            winner: None,
            rng_state: drops.state(),
        })
    }

    /// Wrap an existing grid, e.g. a hand-built test layout.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `exit` is outside `grid`.
    pub fn from_grid(
        id: GameId,
        config: GameConfig,
        grid: MazeGrid,
        exit: Coordinate,
        drop_seed: u64,
        now: Timestamp,
    ) -> EngineResult<Self> {
        if !grid.contains(exit) {
            return Err(EngineError::OutOfBounds {
                row: exit.row as isize,
                col: exit.col as isize,
            });
        }
        Ok(Self {
            id,
            config,
            grid,
            exit,
            created_at: now,
            winner: None,
            rng_state: GameRng::new(drop_seed).state(),
        })
    }

    #[must_use]
    pub fn id(&self) -> GameId {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut MazeGrid {
        &mut self.grid
    }

    #[must_use]
    pub fn exit(&self) -> Coordinate {
        self.exit
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.grid.size()
    }

    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    #[must_use]
    pub fn winner(&self) -> Option<UserId> {
        self.winner
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        if self.is_finished() {
            GameStatus::Finished
        } else {
            GameStatus::Active
        }
    }

    /// Error unless the game is still active.
    pub(crate) fn ensure_active(&self) -> EngineResult<()> {
        if self.is_finished() {
            Err(EngineError::GameAlreadyFinished(self.id))
        } else {
            Ok(())
        }
    }

    /// Drop-roll RNG state, for hosts that persist it between moves.
    #[must_use]
    pub fn rng_state(&self) -> &GameRngState {
        &self.rng_state
    }

    pub fn set_rng_state(&mut self, state: GameRngState) {
        self.rng_state = state;
    }

    pub(crate) fn finish(&mut self, winner: UserId) {
        debug_assert!(self.winner.is_none(), "game finished twice");
        self.winner = Some(winner);
    }
}
