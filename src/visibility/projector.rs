//! Read-only view windows.
//!
//! A viewer sees the `(2R+1) x (2R+1)` square centered on itself, where
//! `R` is its base radius plus view expanders. Other living players inside
//! that square are listed with their offsets.

use serde::{Deserialize, Serialize};

use crate::core::{Coordinate, UserId};
use crate::game::{Game, Player, PlayerColor};
use crate::maze::CellType;

/// What a renderer draws for one window cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisibleCell {
    /// Outside the grid, or an unreached carved pocket.
    Unknown,
    Wall,
    Path,
    Exit,
    Chest,
}

impl From<CellType> for VisibleCell {
    fn from(cell: CellType) -> Self {
        match cell {
            CellType::Wall => VisibleCell::Wall,
            CellType::Empty => VisibleCell::Unknown,
            CellType::Path => VisibleCell::Path,
            CellType::Exit => VisibleCell::Exit,
            CellType::Chest => VisibleCell::Chest,
        }
    }
}

/// Another player inside the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisiblePlayer {
    pub user: UserId,
    pub color: PlayerColor,
    pub position: Coordinate,
    /// `(row, col)` offset from the viewer.
    pub offset: (isize, isize),
}

/// Square window around a viewer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleWindow {
    pub viewer: UserId,
    pub center: Coordinate,
    pub radius: usize,
    /// Row-major, `side() * side()` cells, top-left first.
    pub cells: Vec<VisibleCell>,
    pub players: Vec<VisiblePlayer>,
}

impl VisibleWindow {
    /// Side length, `2R + 1`.
    #[must_use]
    pub fn side(&self) -> usize {
        self.radius * 2 + 1
    }

    /// Cell at a signed offset from the center, `None` outside the window.
    #[must_use]
    pub fn cell_at(&self, dr: isize, dc: isize) -> Option<VisibleCell> {
        let r = self.radius as isize;
        if dr.abs() > r || dc.abs() > r {
            return None;
        }
        let row = (dr + r) as usize;
        let col = (dc + r) as usize;
        Some(self.cells[row * self.side() + col])
    }

    /// Whether `user` appears in the window.
    #[must_use]
    pub fn sees(&self, user: UserId) -> bool {
        self.players.iter().any(|p| p.user == user)
    }
}

/// Compute what `viewer` sees. Pure; never mutates anything.
pub fn project<'a>(
    game: &Game,
    viewer: &Player,
    players: impl IntoIterator<Item = &'a Player>,
) -> VisibleWindow {
    let radius = viewer.view_radius();
    let center = viewer.position;
    let r = radius as isize;
    let grid = game.grid();

    let mut cells = Vec::with_capacity((radius * 2 + 1).pow(2));
    for dr in -r..=r {
        for dc in -r..=r {
            let cell = center
                .offset((dr, dc), grid.size())
                .map_or(VisibleCell::Unknown, |c| grid[c].into());
            cells.push(cell);
        }
    }

    let visible = players
        .into_iter()
        .filter(|p| p.user() != viewer.user() && p.is_active() && p.is_alive)
        .filter(|p| p.position.chebyshev(center) <= radius)
        .map(|p| VisiblePlayer {
            user: p.user(),
            color: p.color,
            position: p.position,
            offset: (
                p.position.row as isize - center.row as isize,
                p.position.col as isize - center.col as isize,
            ),
        })
        .collect();

    VisibleWindow {
        viewer: viewer.user(),
        center,
        radius,
        cells,
        players: visible,
    }
}
