//! Engine error type.
//!
//! Rule-level rejections such as walking into a wall are not errors; they
//! come back as `MoveOutcome::Blocked`. `EngineError` covers bad caller
//! input, lookups that miss, and generation that cannot converge.

use super::ids::GameId;

/// Core error type for the maze engine.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// Target cell lies outside the grid.
    #[error("coordinate ({row}, {col}) is outside the maze")]
    OutOfBounds { row: isize, col: isize },

    /// The game has a winner and accepts no more moves or joins.
    #[error("{0} is already finished")]
    GameAlreadyFinished(GameId),

    /// Unknown game or player.
    #[error("not found: {0}")]
    NotFound(String),

    /// Generation retries ran out without meeting the configured bounds.
    #[error("maze generation exhausted after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },

    /// Configuration cannot produce a valid maze.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A stored record could not be encoded or decoded.
    #[error("record codec error: {0}")]
    Codec(#[from] bincode::Error),
}

/// Result type used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;
