//! Core engine types: coordinates, identifiers, RNG, configuration, errors.
//!
//! Nothing in here knows about cells or players; the maze, game and
//! movement modules build on these.

pub mod coord;
pub mod ids;
pub mod rng;
pub mod config;
pub mod error;

pub use coord::{Coordinate, Direction};
pub use ids::{GameId, PlayerKey, Timestamp, UserId};
pub use rng::{GameRng, GameRngState};
pub use config::{GameConfig, MazeConfig, MIN_SIZE};
pub use error::{EngineError, EngineResult};
