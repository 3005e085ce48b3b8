//! Cell types and the square maze grid.
//!
//! After generation a grid only changes through two transitions, both
//! driven by the movement engine: `Wall -> Path` (dig) and
//! `Chest -> Path` (pickup).

use std::collections::VecDeque;
use std::ops::Index;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Coordinate, EngineError, EngineResult};

/// Terrain of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    /// Impassable unless dug.
    Wall,
    /// Carved during generation but never reached from the boundary.
    /// Not walkable and rendered like unknown terrain.
    Empty,
    /// Walkable and reachable from the boundary.
    Path,
    /// Part of the 3x3 exit block.
    Exit,
    /// Walkable; drops one item on first visit, then becomes `Path`.
    Chest,
}

impl CellType {
    /// Whether a player can stand on this cell.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        matches!(self, CellType::Path | CellType::Exit | CellType::Chest)
    }

    /// Single-character symbol used by the text rendering.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            CellType::Wall => '#',
            CellType::Empty => ' ',
            CellType::Path => '.',
            CellType::Exit => 'E',
            CellType::Chest => 'C',
        }
    }

    /// Parse a symbol produced by [`CellType::symbol`].
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<CellType> {
        match symbol {
            '#' => Some(CellType::Wall),
            ' ' => Some(CellType::Empty),
            '.' => Some(CellType::Path),
            'E' => Some(CellType::Exit),
            'C' => Some(CellType::Chest),
            _ => None,
        }
    }
}

/// `size x size` matrix of cells, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeGrid {
    size: usize,
    cells: Vec<CellType>,
}

impl MazeGrid {
    /// Create a grid with every cell set to `fill`.
    #[must_use]
    pub fn new(size: usize, fill: CellType) -> Self {
        Self {
            size,
            cells: vec![fill; size * size],
        }
    }

    /// Build a grid from rows of cell symbols (`#`, ` `, `.`, `E`, `C`).
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the rows are not square or contain unknown symbols.
    pub fn from_rows(rows: &[&str]) -> EngineResult<Self> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);

        for (row, line) in rows.iter().enumerate() {
            let before = cells.len();
            for symbol in line.chars() {
                let cell = CellType::from_symbol(symbol).ok_or_else(|| {
                    EngineError::InvalidConfig(format!("unknown cell symbol {:?} in row {}", symbol, row))
                })?;
                cells.push(cell);
            }
            if cells.len() - before != size {
                return Err(EngineError::InvalidConfig(format!(
                    "row {} has {} cells, expected {}",
                    row,
                    cells.len() - before,
                    size
                )));
            }
        }

        Ok(Self { size, cells })
    }

    /// Side length.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether `coord` lies inside the grid.
    #[must_use]
    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.row < self.size && coord.col < self.size
    }

    /// Cell at `coord`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, coord: Coordinate) -> Option<CellType> {
        self.contains(coord).then(|| self.cells[self.idx(coord)])
    }

    pub(crate) fn set(&mut self, coord: Coordinate, cell: CellType) {
        let idx = self.idx(coord);
        self.cells[idx] = cell;
    }

    /// Convert a wall to path. Returns false if the cell was not a wall.
    pub(crate) fn dig(&mut self, coord: Coordinate) -> bool {
        if self.get(coord) == Some(CellType::Wall) {
            self.set(coord, CellType::Path);
            true
        } else {
            false
        }
    }

    /// Consume a chest. Returns false if the cell held no chest.
    pub(crate) fn open_chest(&mut self, coord: Coordinate) -> bool {
        if self.get(coord) == Some(CellType::Chest) {
            self.set(coord, CellType::Path);
            true
        } else {
            false
        }
    }

    /// In-bounds 4-neighbors of `coord`.
    #[must_use]
    pub fn neighbors(&self, coord: Coordinate) -> SmallVec<[Coordinate; 4]> {
        coord.neighbors(self.size)
    }

    /// Number of 4-neighbors of `coord` with the given type.
    #[must_use]
    pub fn neighbors_of_type(&self, coord: Coordinate, cell: CellType) -> usize {
        self.neighbors(coord)
            .into_iter()
            .filter(|&n| self[n] == cell)
            .count()
    }

    /// Iterate over all `(coordinate, cell)` pairs, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, CellType)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (Coordinate::new(i / size, i % size), cell))
    }

    /// All cells on the outer boundary, each listed once.
    pub fn boundary(&self) -> impl Iterator<Item = Coordinate> + '_ {
        let size = self.size;
        self.iter()
            .map(|(c, _)| c)
            .filter(move |c| c.is_boundary(size))
    }

    /// Count cells of a given type.
    #[must_use]
    pub fn count(&self, cell: CellType) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Shortest walk from any walkable boundary cell to `target`,
    /// through walkable cells. `None` if `target` cannot be reached.
    #[must_use]
    pub fn solution_length(&self, target: Coordinate) -> Option<usize> {
        if !self.contains(target) {
            return None;
        }

        let mut dist = vec![usize::MAX; self.cells.len()];
        let mut queue = VecDeque::new();

        for c in self.boundary() {
            if self[c].is_walkable() {
                dist[self.idx(c)] = 0;
                queue.push_back(c);
            }
        }

        while let Some(c) = queue.pop_front() {
            let d = dist[self.idx(c)];
            if c == target {
                return Some(d);
            }
            for n in self.neighbors(c) {
                let ni = self.idx(n);
                if dist[ni] == usize::MAX && self[n].is_walkable() {
                    dist[ni] = d + 1;
                    queue.push_back(n);
                }
            }
        }

        None
    }

    pub(crate) fn idx(&self, coord: Coordinate) -> usize {
        coord.row * self.size + coord.col
    }
}

impl Index<Coordinate> for MazeGrid {
    type Output = CellType;

    fn index(&self, coord: Coordinate) -> &Self::Output {
        &self.cells[self.idx(coord)]
    }
}

impl std::fmt::Display for MazeGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.size) {
            let line: String = row.iter().map(|c| c.symbol()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
