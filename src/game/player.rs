//! Players and the per-game player table.
//!
//! ## PlayerTable
//!
//! Index-addressed storage for every player of one game, backed by an
//! `im::Vector` so a snapshot of the table is an O(1) clone. Lookups by
//! user go through `index_of`; mutation goes through `IndexMut`, which only
//! the owning `Arena` and the movement engine reach.

use im::Vector;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::inventory::Inventory;
use crate::core::{Coordinate, PlayerKey, Timestamp, UserId};

/// Fixed palette of player colors. Joins take the first free one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
    Cyan,
    Magenta,
    Lime,
    Pink,
}

impl PlayerColor {
    /// Palette in assignment order.
    pub const PALETTE: [PlayerColor; 10] = [
        PlayerColor::Red,
        PlayerColor::Blue,
        PlayerColor::Green,
        PlayerColor::Yellow,
        PlayerColor::Purple,
        PlayerColor::Orange,
        PlayerColor::Cyan,
        PlayerColor::Magenta,
        PlayerColor::Lime,
        PlayerColor::Pink,
    ];

    /// RGB triple for renderers.
    #[must_use]
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            PlayerColor::Red => (230, 25, 75),
            PlayerColor::Blue => (0, 130, 200),
            PlayerColor::Green => (60, 180, 75),
            PlayerColor::Yellow => (255, 225, 25),
            PlayerColor::Purple => (145, 30, 180),
            PlayerColor::Orange => (245, 130, 48),
            PlayerColor::Cyan => (70, 240, 240),
            PlayerColor::Magenta => (240, 50, 230),
            PlayerColor::Lime => (210, 245, 60),
            PlayerColor::Pink => (250, 190, 212),
        }
    }

    /// First palette color not in `taken`, or the first color when all are taken.
    #[must_use]
    pub fn first_free(taken: impl IntoIterator<Item = PlayerColor>) -> PlayerColor {
        let taken: Vec<PlayerColor> = taken.into_iter().collect();
        Self::PALETTE
            .into_iter()
            .find(|c| !taken.contains(c))
            .unwrap_or(Self::PALETTE[0])
    }
}

/// A user taking part in one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub key: PlayerKey,
    pub position: Coordinate,
    pub spawn_position: Coordinate,
    pub color: PlayerColor,
    pub base_view_radius: usize,
    pub inventory: Inventory,
    pub is_alive: bool,
    /// Set by `Arena::leave`. The record stays; the color is released.
    #[serde(default)]
    pub has_left: bool,
    pub joined_at: Timestamp,
    pub last_move_at: Timestamp,
}

impl Player {
    /// New player standing on its spawn.
    #[must_use]
    pub fn new(
        key: PlayerKey,
        spawn: Coordinate,
        color: PlayerColor,
        base_view_radius: usize,
        inventory: Inventory,
        now: Timestamp,
    ) -> Self {
        Self {
            key,
            position: spawn,
            spawn_position: spawn,
            color,
            base_view_radius,
            inventory,
            is_alive: true,
            has_left: false,
            joined_at: now,
            last_move_at: now,
        }
    }

    #[must_use]
    pub fn user(&self) -> UserId {
        self.key.user
    }

    /// Still in the game, i.e. has not left.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.has_left
    }

    /// Base radius plus one per view expander.
    #[must_use]
    pub fn view_radius(&self) -> usize {
        self.base_view_radius + self.inventory.view_expanders as usize
    }

    /// Kill the player and bring it straight back at its spawn.
    pub(crate) fn respawn(&mut self) {
        self.is_alive = false;
        self.position = self.spawn_position;
        self.is_alive = true;
    }
}

/// Index into a `PlayerTable`. Stable until a player leaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlayerIndex(pub usize);

/// Player records of one game, addressed by index.
///
/// Records of players who left stay in the table. Lookups by user, `iter`,
/// `len` and `occupant_at` only see active players.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerTable {
    players: Vector<Player>,
}

impl PlayerTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Index of the active player for `user`.
    #[must_use]
    pub fn index_of(&self, user: UserId) -> Option<PlayerIndex> {
        self.players
            .iter()
            .position(|p| p.user() == user && p.is_active())
            .map(PlayerIndex)
    }

    /// Index of any record for `user`, active or not.
    pub(crate) fn record_of(&self, user: UserId) -> Option<PlayerIndex> {
        self.players.iter().position(|p| p.user() == user).map(PlayerIndex)
    }

    /// Active player for `user`.
    #[must_use]
    pub fn get(&self, user: UserId) -> Option<&Player> {
        self.iter().find(|p| p.user() == user)
    }

    /// First living player other than `except` standing on `cell`.
    #[must_use]
    pub fn occupant_at(&self, cell: Coordinate, except: PlayerIndex) -> Option<PlayerIndex> {
        self.players
            .iter()
            .enumerate()
            .find(|&(i, p)| i != except.0 && p.is_active() && p.is_alive && p.position == cell)
            .map(|(i, _)| PlayerIndex(i))
    }

    pub(crate) fn push(&mut self, player: Player) -> PlayerIndex {
        self.players.push_back(player);
        PlayerIndex(self.players.len() - 1)
    }

    /// Active players in join order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_active())
    }
}

impl FromIterator<Player> for PlayerTable {
    fn from_iter<I: IntoIterator<Item = Player>>(iter: I) -> Self {
        Self {
            players: iter.into_iter().collect(),
        }
    }
}

impl Index<PlayerIndex> for PlayerTable {
    type Output = Player;

    fn index(&self, index: PlayerIndex) -> &Self::Output {
        &self.players[index.0]
    }
}

impl IndexMut<PlayerIndex> for PlayerTable {
    fn index_mut(&mut self, index: PlayerIndex) -> &mut Self::Output {
        &mut self.players[index.0]
    }
}
