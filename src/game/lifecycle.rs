//! Spawn selection for joining players.

use log::warn;
use rustc_hash::FxHashSet;

use crate::core::{Coordinate, GameRng};
use crate::maze::{CellType, MazeGrid};

/// Pick a spawn on the outer edge.
///
/// Tries `attempts` random edge cells first, then scans the top, bottom,
/// left and right edges in order. A spawn must be `Path` and not already
/// used by another player. Falls back to `(0, 0)` when every edge cell is
/// taken.
pub fn pick_spawn(
    grid: &MazeGrid,
    taken: &FxHashSet<Coordinate>,
    attempts: usize,
    rng: &mut GameRng,
) -> Coordinate {
    let size = grid.size();
    let last = size - 1;
    let free = |c: Coordinate| grid[c] == CellType::Path && !taken.contains(&c);

    for _ in 0..attempts {
        let along = rng.gen_range(0..size);
        let candidate = match rng.gen_range(0..4) {
            0 => Coordinate::new(0, along),
            1 => Coordinate::new(last, along),
            2 => Coordinate::new(along, 0),
            _ => Coordinate::new(along, last),
        };
        if free(candidate) {
            return candidate;
        }
    }

    let scan = (0..size)
        .map(|col| Coordinate::new(0, col))
        .chain((0..size).map(|col| Coordinate::new(last, col)))
        .chain((0..size).map(|row| Coordinate::new(row, 0)))
        .chain((0..size).map(|row| Coordinate::new(row, last)));

    for candidate in scan {
        if free(candidate) {
            warn!("random spawn failed {} times, scanned edge to {}", attempts, candidate);
            return candidate;
        }
    }

    warn!("no free edge cell in {}x{} grid, spawning at (0, 0)", size, size);
    Coordinate::new(0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_on_free_edge_path() {
        let grid = MazeGrid::new(9, CellType::Path);
        let mut rng = GameRng::new(4);
        let taken = FxHashSet::default();

        for _ in 0..50 {
            let spawn = pick_spawn(&grid, &taken, 100, &mut rng);
            assert!(spawn.is_boundary(9));
        }
    }

    #[test]
    fn test_spawn_avoids_taken() {
        let grid = MazeGrid::from_rows(&[
            "..###",
            "#####",
            "#####",
            "#####",
            "#####",
        ])
        .unwrap();
        let taken: FxHashSet<_> = [Coordinate::new(0, 0)].into_iter().collect();

        let spawn = pick_spawn(&grid, &taken, 100, &mut GameRng::new(1));
        assert_eq!(spawn, Coordinate::new(0, 1));
    }

    #[test]
    fn test_scan_fallback_without_random_attempts() {
        let grid = MazeGrid::from_rows(&[
            "#####",
            "#####",
            "#####",
            "#####",
            "###.#",
        ])
        .unwrap();

        let spawn = pick_spawn(&grid, &FxHashSet::default(), 0, &mut GameRng::new(1));
        assert_eq!(spawn, Coordinate::new(4, 3));
    }

    #[test]
    fn test_ultimate_fallback() {
        let grid = MazeGrid::new(5, CellType::Wall);
        let spawn = pick_spawn(&grid, &FxHashSet::default(), 10, &mut GameRng::new(1));
        assert_eq!(spawn, Coordinate::new(0, 0));
    }
}
