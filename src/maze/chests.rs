//! Chest placement.
//!
//! One chest per `chest_frequency` path cells, never on a dead end, with a
//! minimum Manhattan spacing that shrinks as the chest count grows.

use log::debug;

use super::grid::{CellType, MazeGrid};
use crate::core::{Coordinate, GameRng};

/// Minimum Manhattan distance between chests for a given chest count.
#[must_use]
pub fn chest_spacing(count: usize) -> usize {
    match count {
        0..=99 => 15,
        100..=299 => 10,
        300..=599 => 7,
        600..=999 => 5,
        _ => 3,
    }
}

/// Place chests on `grid`, returning how many were placed.
///
/// Candidates are `Path` cells with at least two `Path` neighbors, taken in
/// shuffled order and accepted greedily while they respect the spacing.
/// When candidates run out before the target, the spacing is re-derived
/// from the smaller count and placement repeats, so the final layout always
/// satisfies the spacing its own chest count implies.
pub fn place_chests(grid: &mut MazeGrid, chest_frequency: usize, rng: &mut GameRng) -> usize {
    let path_count = grid.count(CellType::Path);
    let mut target = path_count / chest_frequency.max(1);
    if target == 0 {
        return 0;
    }

    let mut candidates: Vec<Coordinate> = grid
        .iter()
        .filter(|&(c, cell)| cell == CellType::Path && grid.neighbors_of_type(c, CellType::Path) >= 2)
        .map(|(c, _)| c)
        .collect();
    rng.shuffle(&mut candidates);

    let placed = loop {
        let spacing = chest_spacing(target);
        let placed = select_spaced(&candidates, target, spacing);
        if placed.len() == target || chest_spacing(placed.len()) == spacing {
            break placed;
        }
        debug!(
            "placed {} of {} chests at spacing {}, retrying at spacing {}",
            placed.len(),
            target,
            spacing,
            chest_spacing(placed.len())
        );
        target = placed.len();
    };

    for &c in &placed {
        grid.set(c, CellType::Chest);
    }
    placed.len()
}

fn select_spaced(candidates: &[Coordinate], target: usize, spacing: usize) -> Vec<Coordinate> {
    let mut placed: Vec<Coordinate> = Vec::with_capacity(target);
    for &c in candidates {
        if placed.len() == target {
            break;
        }
        if placed.iter().all(|p| p.manhattan(c) >= spacing) {
            placed.push(c);
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacing_thresholds() {
        assert_eq!(chest_spacing(0), 15);
        assert_eq!(chest_spacing(99), 15);
        assert_eq!(chest_spacing(100), 10);
        assert_eq!(chest_spacing(299), 10);
        assert_eq!(chest_spacing(300), 7);
        assert_eq!(chest_spacing(600), 5);
        assert_eq!(chest_spacing(999), 5);
        assert_eq!(chest_spacing(1000), 3);
    }

    #[test]
    fn test_no_chests_below_frequency() {
        let mut grid = MazeGrid::new(5, CellType::Path);
        assert_eq!(place_chests(&mut grid, 100, &mut GameRng::new(1)), 0);
        assert_eq!(grid.count(CellType::Chest), 0);
    }

    #[test]
    fn test_chests_respect_spacing_and_dead_ends() {
        let mut grid = MazeGrid::new(40, CellType::Path);
        let placed = place_chests(&mut grid, 20, &mut GameRng::new(2));

        assert!(placed > 0);
        let chests: Vec<_> = grid
            .iter()
            .filter(|&(_, cell)| cell == CellType::Chest)
            .map(|(c, _)| c)
            .collect();
        assert_eq!(chests.len(), placed);

        let spacing = chest_spacing(placed);
        for (i, a) in chests.iter().enumerate() {
            assert!(grid.neighbors_of_type(*a, CellType::Path) >= 2);
            for b in &chests[i + 1..] {
                assert!(a.manhattan(*b) >= spacing);
            }
        }
    }

    #[test]
    fn test_dead_ends_never_chosen() {
        // A single corridor: both ends are dead ends.
        let mut grid = MazeGrid::from_rows(&[
            "#####",
            "#...#",
            "#####",
            "#####",
            "#####",
        ])
        .unwrap();

        let placed = place_chests(&mut grid, 1, &mut GameRng::new(3));
        assert_eq!(placed, 1);
        assert_eq!(grid[Coordinate::new(1, 2)], CellType::Chest);
    }
}
