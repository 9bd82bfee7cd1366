//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Team affiliation of a combat unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamId {
    #[default]
    Red,
    Blue,
}

impl TeamId {
    /// Number of teams in play.
    pub const COUNT: usize = 2;

    /// Stable index into per-team tables.
    pub fn index(self) -> usize {
        match self {
            TeamId::Red => 0,
            TeamId::Blue => 1,
        }
    }

    /// The opposing team (two-team battles).
    pub fn opponent(self) -> TeamId {
        match self {
            TeamId::Red => TeamId::Blue,
            TeamId::Blue => TeamId::Red,
        }
    }
}

/// Category of incoming damage; decides which mitigation formula applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    /// Reduced by armor (minus attacker penetration).
    #[default]
    Physical,
    /// Reduced by magic resist.
    Magic,
    /// Ignores armor and resists.
    True,
}

/// Battle lifecycle phase (top-level engine state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    /// Engine constructed, no tick processing yet.
    #[default]
    Idle,
    Active,
    Paused,
}

/// Semantic color tag for floating popup text.
/// The presentation layer maps these to actual colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopupColor {
    Damage,
    Crit,
    Blocked,
    Heal,
    Miss,
}
