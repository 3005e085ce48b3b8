//! Single-step movement resolution.
//!
//! ## Resolution order
//!
//! 1. Finished game, unknown mover and out-of-bounds targets are errors;
//!    a dead mover is a no-op.
//! 2. Wall: dig with a shovel, otherwise blocked.
//! 3. Occupied by a living player: combat.
//! 4. Chest: roll an item, consume the chest, move in.
//! 5. Path or exit: move in.
//! 6. Landing on the exit anchor wins the game.
//!
//! All checks that can fail run before any state is touched.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::combat::{resolve_combat, CombatResult};
use crate::core::{Direction, EngineError, EngineResult, GameRng, Timestamp, UserId};
use crate::game::{Game, ItemType, PlayerTable};
use crate::maze::CellType;

/// Successful result of a move. Rule rejections are `Blocked`, not errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// Stepped onto a path or exit cell.
    Moved,
    /// Nothing changed: wall without shovel, unarmed attack, carved pocket,
    /// or a dead mover.
    Blocked,
    /// Spent a shovel and moved into the dug cell.
    Dug,
    /// Opened a chest and moved onto it.
    PickedUp(ItemType),
    /// Killed the occupant and took its cell.
    CombatWin { defender: UserId },
    /// Attack absorbed by the occupant's shields; mover stays put.
    CombatBlocked { defender: UserId },
    /// Landed on the exit anchor. The game is now finished.
    GameWon,
}

impl MoveOutcome {
    /// Whether the mover changed position.
    #[must_use]
    pub fn moved(self) -> bool {
        matches!(
            self,
            MoveOutcome::Moved
                | MoveOutcome::Dug
                | MoveOutcome::PickedUp(_)
                | MoveOutcome::CombatWin { .. }
                | MoveOutcome::GameWon
        )
    }
}

/// Apply one step by `mover` in `direction`.
///
/// Mutates the grid (digs, chests), the mover, and on combat the defender.
/// Must not run concurrently with any other operation on the same game.
///
/// # Errors
///
/// - `GameAlreadyFinished` if the game has a winner
/// - `NotFound` if `mover` has not joined
/// - `OutOfBounds` if the step leaves the grid
pub fn apply_move(
    game: &mut Game,
    players: &mut PlayerTable,
    mover: UserId,
    direction: Direction,
    rng: &mut GameRng,
    now: Timestamp,
) -> EngineResult<MoveOutcome> {
    game.ensure_active()?;

    let index = players
        .index_of(mover)
        .ok_or_else(|| EngineError::NotFound(format!("{} in {}", mover, game.id())))?;

    if !players[index].is_alive {
        return Ok(MoveOutcome::Blocked);
    }

    let from = players[index].position;
    let target = from.step(direction, game.size()).ok_or_else(|| {
        let (dr, dc) = direction.delta();
        EngineError::OutOfBounds {
            row: from.row as isize + dr,
            col: from.col as isize + dc,
        }
    })?;

    let cell = game.grid()[target];
    let outcome = match cell {
        CellType::Wall => {
            if players[index].inventory.take(ItemType::Shovel) {
                game.grid_mut().dig(target);
                players[index].position = target;
                MoveOutcome::Dug
            } else {
                MoveOutcome::Blocked
            }
        }
        CellType::Empty => MoveOutcome::Blocked,
        CellType::Path | CellType::Exit | CellType::Chest => {
            if let Some(defender) = players.occupant_at(target, index) {
                let defender_user = players[defender].user();
                let attacker_swords = players[index].inventory.swords;
                match resolve_combat(attacker_swords, players[defender].inventory.shields) {
                    CombatResult::Unarmed => MoveOutcome::Blocked,
                    CombatResult::Killed => {
                        players[index].inventory.swords = 0;
                        players[defender].inventory.shields = 0;
                        players[defender].respawn();
                        players[index].position = target;
                        MoveOutcome::CombatWin { defender: defender_user }
                    }
                    CombatResult::Repelled { shields_left } => {
                        players[index].inventory.swords = 0;
                        players[defender].inventory.shields = shields_left;
                        MoveOutcome::CombatBlocked { defender: defender_user }
                    }
                }
            } else if cell == CellType::Chest {
                let item = roll_item(rng);
                players[index].inventory.add(item);
                game.grid_mut().open_chest(target);
                players[index].position = target;
                MoveOutcome::PickedUp(item)
            } else {
                players[index].position = target;
                MoveOutcome::Moved
            }
        }
    };

    if outcome != MoveOutcome::Blocked {
        players[index].last_move_at = now;
    }

    if outcome.moved() && players[index].position == game.exit() {
        game.finish(mover);
        info!("{} reached the exit of {} and won", mover, game.id());
        return Ok(MoveOutcome::GameWon);
    }

    debug!("{} moved {} from {} in {}: {:?}", mover, direction, from, game.id(), outcome);
    Ok(outcome)
}

/// Uniform draw over every item type.
fn roll_item(rng: &mut GameRng) -> ItemType {
    ItemType::ALL[rng.gen_range(0..ItemType::ALL.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Coordinate, GameConfig, GameId, PlayerKey};
    use crate::game::{Inventory, Player, PlayerColor};
    use crate::maze::MazeGrid;

    fn setup(rows: &[&str], exit: Coordinate) -> Game {
        let grid = MazeGrid::from_rows(rows).unwrap();
        Game::from_grid(GameId::new(1, 1), GameConfig::default(), grid, exit, 11, Timestamp(0)).unwrap()
    }

    fn player(user: i64, at: Coordinate, inventory: Inventory) -> Player {
        Player::new(
            PlayerKey::new(GameId::new(1, 1), UserId(user)),
            at,
            PlayerColor::Red,
            2,
            inventory,
            Timestamp(0),
        )
    }

    #[test]
    fn test_plain_move_updates_timestamp() {
        let mut game = setup(&["...", "...", "..."], Coordinate::new(2, 2));
        let mut players: PlayerTable = [player(1, Coordinate::new(0, 0), Inventory::default())].into_iter().collect();

        let outcome = apply_move(&mut game, &mut players, UserId(1), Direction::Right, &mut GameRng::new(1), Timestamp(9)).unwrap();

        assert_eq!(outcome, MoveOutcome::Moved);
        let p = players.get(UserId(1)).unwrap();
        assert_eq!(p.position, Coordinate::new(0, 1));
        assert_eq!(p.last_move_at, Timestamp(9));
    }

    #[test]
    fn test_blocked_keeps_timestamp() {
        let mut game = setup(&[".#.", "...", "..."], Coordinate::new(2, 2));
        let mut players: PlayerTable = [player(1, Coordinate::new(0, 0), Inventory::default())].into_iter().collect();

        let outcome = apply_move(&mut game, &mut players, UserId(1), Direction::Right, &mut GameRng::new(1), Timestamp(9)).unwrap();

        assert_eq!(outcome, MoveOutcome::Blocked);
        assert_eq!(players.get(UserId(1)).unwrap().last_move_at, Timestamp(0));
    }

    #[test]
    fn test_empty_pocket_blocks() {
        let mut game = setup(&[". .", "...", "..."], Coordinate::new(2, 2));
        let mut players: PlayerTable = [player(1, Coordinate::new(0, 0), Inventory { shovels: 1, ..Inventory::default() })]
            .into_iter()
            .collect();

        let outcome = apply_move(&mut game, &mut players, UserId(1), Direction::Right, &mut GameRng::new(1), Timestamp(1)).unwrap();

        assert_eq!(outcome, MoveOutcome::Blocked);
        assert_eq!(players.get(UserId(1)).unwrap().inventory.shovels, 1);
        assert_eq!(game.grid()[Coordinate::new(0, 1)], CellType::Empty);
    }

    #[test]
    fn test_out_of_bounds_reports_target() {
        let mut game = setup(&["...", "...", "..."], Coordinate::new(2, 2));
        let mut players: PlayerTable = [player(1, Coordinate::new(0, 0), Inventory::default())].into_iter().collect();

        let err = apply_move(&mut game, &mut players, UserId(1), Direction::Up, &mut GameRng::new(1), Timestamp(1)).unwrap_err();
        assert!(matches!(err, EngineError::OutOfBounds { row: -1, col: 0 }));
    }

    #[test]
    fn test_dead_mover_is_noop() {
        let mut game = setup(&["...", "...", "..."], Coordinate::new(2, 2));
        let mut dead = player(1, Coordinate::new(0, 0), Inventory::default());
        dead.is_alive = false;
        let mut players: PlayerTable = [dead].into_iter().collect();

        let outcome = apply_move(&mut game, &mut players, UserId(1), Direction::Down, &mut GameRng::new(1), Timestamp(1)).unwrap();
        assert_eq!(outcome, MoveOutcome::Blocked);
        assert_eq!(players.get(UserId(1)).unwrap().position, Coordinate::new(0, 0));
    }

    #[test]
    fn test_chest_roll_is_deterministic() {
        let rows = ["C..", "...", "..."];
        let run = |seed| {
            let mut game = setup(&rows, Coordinate::new(2, 2));
            let mut players: PlayerTable = [player(1, Coordinate::new(0, 1), Inventory::default())].into_iter().collect();
            apply_move(&mut game, &mut players, UserId(1), Direction::Left, &mut GameRng::new(seed), Timestamp(1)).unwrap()
        };

        assert_eq!(run(5), run(5));
        assert!(matches!(run(5), MoveOutcome::PickedUp(_)));
    }

    #[test]
    fn test_moved_classification() {
        assert!(MoveOutcome::Dug.moved());
        assert!(MoveOutcome::CombatWin { defender: UserId(1) }.moved());
        assert!(!MoveOutcome::CombatBlocked { defender: UserId(1) }.moved());
        assert!(!MoveOutcome::Blocked.moved());
    }
}
