//! Maze terrain and procedural generation.

pub mod grid;
pub mod generator;
pub mod chests;

pub use grid::{CellType, MazeGrid};
pub use generator::{GeneratedMaze, MazeGenerator};
pub use chests::chest_spacing;
