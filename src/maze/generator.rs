//! Procedural maze generation.
//!
//! ## Pipeline
//!
//! 1. Fill the grid with walls and open a band along every border.
//! 2. Carve a perfect maze from the center with depth-first backtracking
//!    over a step-2 lattice.
//! 3. Pick an exit anchor in a random quadrant, inside the exit band.
//! 4. If the anchor cannot be reached from the boundary, carve a connector.
//! 5. Stamp the 3x3 exit block.
//! 6. Flood-fill from the boundary, turning reached carved cells into `Path`.
//! 7. Place chests (see `chests`).
//!
//! Generation is deterministic for a given `GameRng` seed.

use std::collections::VecDeque;

use log::{debug, error, warn};

use super::chests::place_chests;
use super::grid::{CellType, MazeGrid};
use crate::core::{Coordinate, Direction, EngineError, EngineResult, GameRng, MazeConfig};

/// Probability that a connector step heads straight for its target.
const CONNECTOR_GREEDY_PROBABILITY: f64 = 0.7;

/// Extra steps a connector walk may take beyond the Manhattan distance.
const CONNECTOR_STEP_SLACK: usize = 20;

/// A finished maze and its exit anchor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedMaze {
    pub grid: MazeGrid,
    pub exit: Coordinate,
}

/// Maze generator for one validated configuration.
#[derive(Clone, Debug)]
pub struct MazeGenerator {
    config: MazeConfig,
}

impl MazeGenerator {
    /// Create a generator.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the configuration cannot produce a maze.
    pub fn new(config: MazeConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    /// Generate one maze. Never fails for a validated configuration.
    pub fn generate(&self, rng: &mut GameRng) -> GeneratedMaze {
        let size = self.config.size;
        let mut grid = MazeGrid::new(size, CellType::Wall);

        open_edge_band(&mut grid, self.config.edge_band_width);
        carve_perfect_maze(&mut grid, Coordinate::new(self.config.center(), self.config.center()), rng);

        let exit = self.pick_exit_anchor(rng);
        let reached = reach_from_boundary(&grid, |c| c == CellType::Empty);
        if !reached[grid.idx(exit)] {
            carve_connector(&mut grid, exit, &reached, self.config.connector_search_radius, rng);
        }

        stamp_exit(&mut grid, exit);
        flood_fill_paths(&mut grid);
        let chests = place_chests(&mut grid, self.config.chest_frequency, rng);

        debug!(
            "generated {}x{} maze: exit at {}, {} path cells, {} chests",
            size,
            size,
            exit,
            grid.count(CellType::Path),
            chests
        );

        GeneratedMaze { grid, exit }
    }

    /// Generate until the maze satisfies `min_solution_length`.
    ///
    /// Each attempt runs on a fresh fork of `rng`.
    ///
    /// # Errors
    ///
    /// `GenerationExhausted` after `max_generation_attempts` failed attempts.
    pub fn generate_with_retries(&self, rng: &mut GameRng) -> EngineResult<GeneratedMaze> {
        let attempts = self.config.max_generation_attempts;

        for attempt in 1..=attempts {
            let mut attempt_rng = rng.fork();
            let maze = self.generate(&mut attempt_rng);

            let Some(required) = self.config.min_solution_length else {
                return Ok(maze);
            };

            match maze.grid.solution_length(maze.exit) {
                Some(length) if length >= required => {
                    debug!("attempt {}: solution length {} accepted", attempt, length);
                    return Ok(maze);
                }
                length => {
                    warn!(
                        "attempt {}/{}: solution length {:?} below required {}",
                        attempt, attempts, length, required
                    );
                }
            }
        }

        error!(
            "maze generation exhausted after {} attempts (size {}, exit band {}..={}, min solution {:?})",
            attempts,
            self.config.size,
            self.config.min_exit_distance_from_edge,
            self.config.max_exit_distance_from_edge,
            self.config.min_solution_length
        );
        Err(EngineError::GenerationExhausted { attempts })
    }

    /// Anchor in a uniformly chosen quadrant, `min..=max` cells from the
    /// two nearest edges.
    fn pick_exit_anchor(&self, rng: &mut GameRng) -> Coordinate {
        let last = self.config.size - 1;
        let band = self.config.min_exit_distance_from_edge..=self.config.max_exit_distance_from_edge;
        let quadrant = rng.gen_range(0..4);
        let dr = rng.gen_range_inclusive(band.clone());
        let dc = rng.gen_range_inclusive(band);

        let row = if quadrant < 2 { dr } else { last - dr };
        let col = if quadrant % 2 == 0 { dc } else { last - dc };
        Coordinate::new(row, col)
    }
}

/// Open every cell closer than `width` to a border.
fn open_edge_band(grid: &mut MazeGrid, width: usize) {
    let size = grid.size();
    let band: Vec<Coordinate> = grid
        .iter()
        .map(|(c, _)| c)
        .filter(|c| c.edge_distance(size) < width)
        .collect();
    for c in band {
        grid.set(c, CellType::Empty);
    }
}

/// One level of the backtracking recursion.
struct Frame {
    cell: Coordinate,
    directions: [Direction; 4],
    next: usize,
}

impl Frame {
    fn new(cell: Coordinate, rng: &mut GameRng) -> Self {
        let mut directions = Direction::ALL;
        rng.shuffle(&mut directions);
        Self { cell, directions, next: 0 }
    }
}

/// Recursive backtracking over cells two steps apart, with an explicit
/// stack so large grids cannot overflow the call stack.
fn carve_perfect_maze(grid: &mut MazeGrid, start: Coordinate, rng: &mut GameRng) {
    let size = grid.size();
    let mut visited = vec![false; size * size];

    visited[grid.idx(start)] = true;
    grid.set(start, CellType::Empty);
    let mut stack = vec![Frame::new(start, rng)];

    while let Some(frame) = stack.last_mut() {
        if frame.next == frame.directions.len() {
            stack.pop();
            continue;
        }

        let direction = frame.directions[frame.next];
        frame.next += 1;
        let cell = frame.cell;

        let (dr, dc) = direction.delta();
        let Some(target) = cell.offset((dr * 2, dc * 2), size) else {
            continue;
        };
        if visited[grid.idx(target)] {
            continue;
        }

        visited[grid.idx(target)] = true;
        if let Some(between) = cell.step(direction, size) {
            grid.set(between, CellType::Empty);
        }
        grid.set(target, CellType::Empty);
        stack.push(Frame::new(target, rng));
    }
}

/// Breadth-first reach from every boundary cell accepted by `passable`.
fn reach_from_boundary(grid: &MazeGrid, passable: impl Fn(CellType) -> bool) -> Vec<bool> {
    let mut reached = vec![false; grid.size() * grid.size()];
    let mut queue: VecDeque<Coordinate> = VecDeque::new();

    for c in grid.boundary() {
        if passable(grid[c]) {
            reached[grid.idx(c)] = true;
            queue.push_back(c);
        }
    }

    while let Some(c) = queue.pop_front() {
        for n in grid.neighbors(c) {
            let ni = grid.idx(n);
            if !reached[ni] && passable(grid[n]) {
                reached[ni] = true;
                queue.push_back(n);
            }
        }
    }

    reached
}

/// Link `from` to the boundary-reachable region.
///
/// Targets the nearest reached cell within `radius`, or the nearest edge
/// cell when none is close. Walks 70% greedy, 30% random, carving as it
/// goes, for at most Manhattan distance + 20 steps; a walk that runs out
/// of steps finishes with a straight carve.
fn carve_connector(
    grid: &mut MazeGrid,
    from: Coordinate,
    reached: &[bool],
    radius: usize,
    rng: &mut GameRng,
) {
    let size = grid.size();
    let target = nearest_reached(grid, from, reached, radius).unwrap_or_else(|| {
        let edge = nearest_edge(from, size);
        warn!("no reachable cell within {} of exit {}, connecting to edge {}", radius, from, edge);
        edge
    });

    let max_steps = from.manhattan(target) + CONNECTOR_STEP_SLACK;
    let mut current = from;
    grid.set(current, CellType::Empty);

    for _ in 0..max_steps {
        if current == target || reached[grid.idx(current)] {
            return;
        }
        let direction = if rng.gen_bool(CONNECTOR_GREEDY_PROBABILITY) {
            greedy_direction(current, target)
        } else {
            Direction::ALL[rng.gen_range(0..4)]
        };
        if let Some(next) = current.step(direction, size) {
            current = next;
            grid.set(current, CellType::Empty);
        }
    }

    while current != target && !reached[grid.idx(current)] {
        let Some(next) = current.step(greedy_direction(current, target), size) else {
            break;
        };
        current = next;
        grid.set(current, CellType::Empty);
    }
}

/// Step along the axis with the larger remaining gap.
fn greedy_direction(from: Coordinate, to: Coordinate) -> Direction {
    let rows = from.row.abs_diff(to.row);
    let cols = from.col.abs_diff(to.col);
    if rows >= cols && rows > 0 {
        if to.row < from.row {
            Direction::Up
        } else {
            Direction::Down
        }
    } else if to.col < from.col {
        Direction::Left
    } else {
        Direction::Right
    }
}

fn nearest_reached(grid: &MazeGrid, from: Coordinate, reached: &[bool], radius: usize) -> Option<Coordinate> {
    let size = grid.size();
    let rows = from.row.saturating_sub(radius)..=(from.row + radius).min(size - 1);

    rows.flat_map(|row| {
        let cols = from.col.saturating_sub(radius)..=(from.col + radius).min(size - 1);
        cols.map(move |col| Coordinate::new(row, col))
    })
    .filter(|c| reached[grid.idx(*c)] && c.manhattan(from) <= radius)
    .min_by_key(|c| c.manhattan(from))
}

fn nearest_edge(from: Coordinate, size: usize) -> Coordinate {
    let last = size - 1;
    let candidates = [
        Coordinate::new(0, from.col),
        Coordinate::new(last, from.col),
        Coordinate::new(from.row, 0),
        Coordinate::new(from.row, last),
    ];
    candidates
        .into_iter()
        .min_by_key(|c| c.manhattan(from))
        .unwrap_or(from)
}

fn stamp_exit(grid: &mut MazeGrid, anchor: Coordinate) {
    let size = grid.size();
    for dr in -1..=1 {
        for dc in -1..=1 {
            if let Some(c) = anchor.offset((dr, dc), size) {
                grid.set(c, CellType::Exit);
            }
        }
    }
}

/// Turn every carved cell reachable from the boundary into `Path`.
/// Unreached carved cells stay `Empty`.
fn flood_fill_paths(grid: &mut MazeGrid) {
    let reached = reach_from_boundary(grid, |c| matches!(c, CellType::Empty | CellType::Exit));
    let carved: Vec<Coordinate> = grid
        .iter()
        .filter(|&(c, cell)| cell == CellType::Empty && reached[grid.idx(c)])
        .map(|(c, _)| c)
        .collect();
    for c in carved {
        grid.set(c, CellType::Path);
    }
}
