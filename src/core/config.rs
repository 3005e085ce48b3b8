//! Engine configuration types.
//!
//! - `MazeConfig`: grid size and generation parameters
//! - `GameConfig`: maze parameters plus per-player starting values
//!
//! Both derive serde so a host can load them from whatever format it uses.

use serde::{Deserialize, Serialize};

use super::error::{EngineError, EngineResult};
use crate::game::Inventory;

/// Smallest grid with room for a one-cell edge band, an exit band clear of
/// it, and a center beyond the exit band.
pub const MIN_SIZE: usize = 10;

/// Maze generation parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeConfig {
    /// Side length of the square grid.
    pub size: usize,

    /// Width of the open band along all four borders.
    pub edge_band_width: usize,

    /// Closest the exit anchor may sit to any edge.
    pub min_exit_distance_from_edge: usize,

    /// Farthest the exit anchor may sit from its nearest edges.
    pub max_exit_distance_from_edge: usize,

    /// One chest per this many `Path` cells.
    pub chest_frequency: usize,

    /// Radius searched around the exit for a cell to connect to.
    pub connector_search_radius: usize,

    /// Reject mazes whose exit is closer than this to the open band.
    pub min_solution_length: Option<usize>,

    /// Attempts before generation gives up with `GenerationExhausted`.
    pub max_generation_attempts: u32,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            size: 121,
            edge_band_width: 3,
            min_exit_distance_from_edge: 40,
            max_exit_distance_from_edge: 50,
            chest_frequency: 50,
            connector_search_radius: 15,
            min_solution_length: None,
            max_generation_attempts: 10,
        }
    }
}

impl MazeConfig {
    /// Config for a grid of `size` with the exit band scaled to fit.
    ///
    /// Keeps the default band on large grids and shrinks it proportionally
    /// on small ones. Valid for every `size >= MIN_SIZE`.
    #[must_use]
    pub fn sized(size: usize) -> Self {
        let default = Self::default();
        if size >= default.size {
            return Self { size, ..default };
        }
        let edge_band_width = (size / 12).clamp(1, default.edge_band_width);
        let center = size / 2;
        let max_exit = center.saturating_sub(3).max(edge_band_width + 2);
        let min_exit = (max_exit * 4 / 5).max(edge_band_width + 2);
        Self {
            size,
            edge_band_width,
            min_exit_distance_from_edge: min_exit,
            max_exit_distance_from_edge: max_exit,
            ..default
        }
    }

    #[must_use]
    pub fn with_edge_band_width(mut self, width: usize) -> Self {
        self.edge_band_width = width;
        self
    }

    #[must_use]
    pub fn with_exit_band(mut self, min: usize, max: usize) -> Self {
        self.min_exit_distance_from_edge = min;
        self.max_exit_distance_from_edge = max;
        self
    }

    #[must_use]
    pub fn with_chest_frequency(mut self, frequency: usize) -> Self {
        self.chest_frequency = frequency;
        self
    }

    #[must_use]
    pub fn with_min_solution_length(mut self, length: usize) -> Self {
        self.min_solution_length = Some(length);
        self
    }

    #[must_use]
    pub fn with_max_generation_attempts(mut self, attempts: u32) -> Self {
        self.max_generation_attempts = attempts;
        self
    }

    /// Grid center cell index (same on both axes).
    #[must_use]
    pub fn center(&self) -> usize {
        self.size / 2
    }

    /// Check that the parameters can produce a valid maze.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidConfig` naming the first violated constraint.
    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |msg: String| Err(EngineError::InvalidConfig(msg));

        if self.size < MIN_SIZE {
            return invalid(format!("size {} is below the minimum of {}", self.size, MIN_SIZE));
        }
        if self.edge_band_width == 0 {
            return invalid("edge_band_width must be at least 1".to_string());
        }
        if self.min_exit_distance_from_edge < self.edge_band_width + 2 {
            return invalid(format!(
                "exit band starts at {} but must clear the edge band of width {}",
                self.min_exit_distance_from_edge, self.edge_band_width
            ));
        }
        if self.max_exit_distance_from_edge < self.min_exit_distance_from_edge {
            return invalid(format!(
                "exit band {}..={} is inverted",
                self.min_exit_distance_from_edge, self.max_exit_distance_from_edge
            ));
        }
        if self.max_exit_distance_from_edge + 1 >= self.center() {
            return invalid(format!(
                "exit band reaches {} but the center of a {}-grid is {}",
                self.max_exit_distance_from_edge,
                self.size,
                self.center()
            ));
        }
        if self.chest_frequency == 0 {
            return invalid("chest_frequency must be positive".to_string());
        }
        if self.max_generation_attempts == 0 {
            return invalid("max_generation_attempts must be positive".to_string());
        }
        Ok(())
    }
}

/// Complete per-game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Maze generation parameters.
    pub maze: MazeConfig,

    /// View radius before view expanders.
    pub base_view_radius: usize,

    /// Items every player starts with.
    pub starting_inventory: Inventory,

    /// Random spawn picks before falling back to an edge scan.
    pub spawn_attempts: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            maze: MazeConfig::default(),
            base_view_radius: 5,
            starting_inventory: Inventory::default(),
            spawn_attempts: 100,
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn new(maze: MazeConfig) -> Self {
        Self { maze, ..Self::default() }
    }

    #[must_use]
    pub fn with_base_view_radius(mut self, radius: usize) -> Self {
        self.base_view_radius = radius;
        self
    }

    #[must_use]
    pub fn with_starting_inventory(mut self, inventory: Inventory) -> Self {
        self.starting_inventory = inventory;
        self
    }
}
