//! Movement, digging, pickups and combat.

pub mod combat;
pub mod engine;

pub use combat::{resolve_combat, CombatResult};
pub use engine::{apply_move, MoveOutcome};
