//! Grid coordinates and movement directions.
//!
//! Coordinates are `(row, col)` pairs with `0 <= row, col < size`.
//! Row 0 is the top edge of the maze; `Direction::Up` decreases the row.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A cell position on a square grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to another coordinate.
    #[must_use]
    pub fn manhattan(self, other: Coordinate) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Chebyshev (square window) distance to another coordinate.
    #[must_use]
    pub fn chebyshev(self, other: Coordinate) -> usize {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }

    /// Step one cell in `direction`, or `None` if the step leaves `[0, size)`.
    #[must_use]
    pub fn step(self, direction: Direction, size: usize) -> Option<Coordinate> {
        self.offset(direction.delta(), size)
    }

    /// Shift by a signed `(row, col)` delta, or `None` when out of `[0, size)`.
    #[must_use]
    pub fn offset(self, (dr, dc): (isize, isize), size: usize) -> Option<Coordinate> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        (row < size && col < size).then_some(Coordinate { row, col })
    }

    /// In-bounds 4-neighbors, in `Direction::ALL` order.
    #[must_use]
    pub fn neighbors(self, size: usize) -> SmallVec<[Coordinate; 4]> {
        Direction::ALL
            .iter()
            .filter_map(|&d| self.step(d, size))
            .collect()
    }

    /// Distance to the nearest grid edge.
    #[must_use]
    pub fn edge_distance(self, size: usize) -> usize {
        let last = size.saturating_sub(1);
        self.row.min(self.col).min(last - self.row).min(last - self.col)
    }

    /// Whether the cell lies on the outer boundary.
    #[must_use]
    pub fn is_boundary(self, size: usize) -> bool {
        self.edge_distance(size) == 0
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in a fixed order.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Signed `(row, col)` delta of one step.
    #[must_use]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distances() {
        let a = Coordinate::new(2, 3);
        let b = Coordinate::new(5, 1);

        assert_eq!(a.manhattan(b), 5);
        assert_eq!(a.chebyshev(b), 3);
        assert_eq!(a.manhattan(a), 0);
    }

    #[test]
    fn test_step_bounds() {
        let corner = Coordinate::new(0, 0);
        assert_eq!(corner.step(Direction::Up, 10), None);
        assert_eq!(corner.step(Direction::Left, 10), None);
        assert_eq!(corner.step(Direction::Down, 10), Some(Coordinate::new(1, 0)));

        let far = Coordinate::new(9, 9);
        assert_eq!(far.step(Direction::Right, 10), None);
        assert_eq!(far.step(Direction::Up, 10), Some(Coordinate::new(8, 9)));
    }

    #[test]
    fn test_neighbors() {
        assert_eq!(Coordinate::new(0, 0).neighbors(5).len(), 2);
        assert_eq!(Coordinate::new(0, 2).neighbors(5).len(), 3);
        assert_eq!(Coordinate::new(2, 2).neighbors(5).len(), 4);
    }

    #[test]
    fn test_edge_distance() {
        assert_eq!(Coordinate::new(0, 4).edge_distance(9), 0);
        assert_eq!(Coordinate::new(4, 4).edge_distance(9), 4);
        assert_eq!(Coordinate::new(7, 3).edge_distance(9), 1);
        assert!(Coordinate::new(8, 3).is_boundary(9));
        assert!(!Coordinate::new(1, 3).is_boundary(9));
    }

    #[test]
    fn test_serialization() {
        let c = Coordinate::new(7, 11);
        let json = serde_json::to_string(&c).unwrap();
        let back: Coordinate = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
