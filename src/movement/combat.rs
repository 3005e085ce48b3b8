//! Combat between a mover and the player occupying its target cell.
//!
//! Swords are spent against shields one for one. An attacker with swords
//! left over after the defender's shields are used up kills the defender;
//! otherwise the attack is absorbed. Either way the attacker loses every
//! sword it carried.

/// Result of one attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatResult {
    /// Attacker has no swords; nothing happens.
    Unarmed,
    /// Defender dies and respawns; attacker takes the cell.
    Killed,
    /// Defender's shields absorbed the attack, `shields_left` remain.
    Repelled { shields_left: u32 },
}

/// Resolve an attack from the counts alone.
#[must_use]
pub fn resolve_combat(attacker_swords: u32, defender_shields: u32) -> CombatResult {
    if attacker_swords == 0 {
        return CombatResult::Unarmed;
    }
    let used = attacker_swords.min(defender_shields);
    if attacker_swords > used {
        CombatResult::Killed
    } else {
        CombatResult::Repelled {
            shields_left: defender_shields - used,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unarmed() {
        assert_eq!(resolve_combat(0, 0), CombatResult::Unarmed);
        assert_eq!(resolve_combat(0, 5), CombatResult::Unarmed);
    }

    #[test]
    fn test_surplus_swords_kill() {
        assert_eq!(resolve_combat(3, 1), CombatResult::Killed);
        assert_eq!(resolve_combat(1, 0), CombatResult::Killed);
    }

    #[test]
    fn test_shields_absorb() {
        assert_eq!(resolve_combat(1, 3), CombatResult::Repelled { shields_left: 2 });
        assert_eq!(resolve_combat(2, 2), CombatResult::Repelled { shields_left: 0 });
    }
}
