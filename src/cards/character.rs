//! Shared character stat block for heroes and allies.
//!
//! Capability predicates ("can quest", "can defend", "can attack") default
//! from the printed stats but are plain data that individual cards may
//! override. A hero that can never quest sets `overrides.quest = Some(false)`
//! instead of shipping special-case code in the engine.

use serde::{Deserialize, Serialize};

/// Per-card overrides of the default capability predicates.
///
/// `None` means "use the stat-derived default".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityOverrides {
    pub quest: Option<bool>,
    pub defend: Option<bool>,
    pub attack: Option<bool>,
}

/// Mutable stat block shared by heroes and allies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub willpower: i64,
    pub attack: i64,
    pub defense: i64,
    pub hit_points: i64,

    /// Exhausted characters cannot quest, attack, defend, or pay costs
    /// until the Refresh phase readies them.
    pub exhausted: bool,

    /// Committed to the current round's quest.
    pub committed: bool,

    pub overrides: CapabilityOverrides,
}

impl Character {
    /// Create a stat block from printed values, ready and uncommitted.
    #[must_use]
    pub fn new(willpower: i64, attack: i64, defense: i64, hit_points: i64) -> Self {
        Self {
            willpower,
            attack,
            defense,
            hit_points,
            exhausted: false,
            committed: false,
            overrides: CapabilityOverrides::default(),
        }
    }

    /// Can this character be committed to a quest?
    #[must_use]
    pub fn can_quest(&self) -> bool {
        self.overrides.quest.unwrap_or(self.willpower > 0)
    }

    /// Can this character be declared as a defender?
    #[must_use]
    pub fn can_defend(&self) -> bool {
        self.overrides.defend.unwrap_or(self.defense > 0)
    }

    /// Can this character be declared as an attacker?
    #[must_use]
    pub fn can_attack(&self) -> bool {
        self.overrides.attack.unwrap_or(true)
    }

    /// Is this character defeated (hit points at or below zero)?
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.hit_points <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_derive_from_stats() {
        let quester = Character::new(2, 0, 0, 1);
        assert!(quester.can_quest());
        assert!(!quester.can_defend());
        assert!(quester.can_attack());

        let wall = Character::new(0, 1, 3, 4);
        assert!(!wall.can_quest());
        assert!(wall.can_defend());
    }

    #[test]
    fn test_overrides_beat_stats() {
        // High willpower but barred from questing, like a pure support hero.
        let mut support = Character::new(4, 0, 0, 4);
        support.overrides.quest = Some(false);
        support.overrides.defend = Some(false);
        support.overrides.attack = Some(false);

        assert!(!support.can_quest());
        assert!(!support.can_defend());
        assert!(!support.can_attack());
    }

    #[test]
    fn test_defeat_threshold() {
        let mut c = Character::new(1, 1, 1, 2);
        assert!(!c.is_defeated());
        c.hit_points = 0;
        assert!(c.is_defeated());
        c.hit_points = -3;
        assert!(c.is_defeated());
    }
}
