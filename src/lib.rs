//! # maze-engine
//!
//! Procedural maze generation and a multiplayer movement engine for a chat
//! maze game.
//!
//! ## Design Principles
//!
//! 1. **Explicit randomness**: Every random choice takes a `GameRng` argument.
//!    A seed reproduces a maze; a seed plus a move log reproduces a game.
//!
//! 2. **Closed outcomes**: Moves return a `MoveOutcome` the caller matches on.
//!    Walking into a wall is `Blocked`, not an error.
//!
//! 3. **Single writer per game**: An `Arena` owns one game's grid and players.
//!    `GameHost` serializes all work on a game and lets different games run
//!    in parallel.
//!
//! ## Modules
//!
//! - `core`: Coordinates, identifiers, RNG, configuration, errors
//! - `maze`: Cell types, grid, generator, chest placement
//! - `game`: Game records, players, inventories, arena lifecycle
//! - `movement`: Move resolution and combat
//! - `visibility`: Per-player view windows
//! - `store`: Persistence collaborator trait and in-memory store
//! - `host`: Per-game serialized entry point

pub mod core;
pub mod maze;
pub mod game;
pub mod movement;
pub mod visibility;
pub mod store;
pub mod host;

// Re-export commonly used types
pub use crate::core::{
    Coordinate, Direction,
    GameId, PlayerKey, Timestamp, UserId,
    GameRng, GameRngState,
    GameConfig, MazeConfig,
    EngineError, EngineResult,
};

pub use crate::maze::{CellType, GeneratedMaze, MazeGenerator, MazeGrid};

pub use crate::game::{Arena, Game, GameStatus, Inventory, ItemType, Player, PlayerColor, PlayerTable};

pub use crate::movement::{apply_move, MoveOutcome};

pub use crate::visibility::{project, VisibleCell, VisiblePlayer, VisibleWindow};

pub use crate::store::{GameStore, MemoryStore};

pub use crate::host::GameHost;
