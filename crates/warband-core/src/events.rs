//! Events emitted by the simulation for audio/UI feedback and logging.

use serde::{Deserialize, Serialize};

use crate::enums::{DamageType, PopupColor, TeamId};
use crate::types::Position;

/// Fire-and-forget presentation cues. The core never waits on these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeedbackEvent {
    /// A unit started an attack swing.
    AttackSwing { unit: u32 },
    /// A unit finished off its target.
    VictoryCry { unit: u32 },
    /// A unit was promoted to a new rank.
    RankPromotion { unit: u32, rank: String },
    /// A unit died.
    UnitDied { unit: u32, team: TeamId },
    /// Floating text at a world position.
    Popup {
        position: Position,
        text: String,
        color: PopupColor,
    },
}

/// Completed damage application, with everything a listener needs to
/// render feedback or keep statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageOutcome {
    pub attacker: Option<u32>,
    pub target: u32,
    /// Incoming amount (post-crit, pre-mitigation).
    pub base_amount: f64,
    /// Amount actually subtracted from health.
    pub final_amount: f64,
    pub damage_type: DamageType,
    pub crit: bool,
    pub evaded: bool,
    pub blocked: bool,
    pub position: Position,
}

/// Completed heal application. `amount` is the health actually restored,
/// which may be less than requested near full health.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealOutcome {
    pub healer: Option<u32>,
    pub target: u32,
    pub amount: f64,
    pub position: Position,
}
