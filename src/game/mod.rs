//! Game lifecycle: records, players, inventories and the per-game arena.

pub mod inventory;
pub mod player;
pub mod game;
pub mod lifecycle;
pub mod arena;

pub use inventory::{Inventory, ItemType};
pub use player::{Player, PlayerColor, PlayerIndex, PlayerTable};
pub use game::{Game, GameStatus};
pub use arena::Arena;
