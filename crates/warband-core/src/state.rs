//! Snapshot types: a complete, serializable view of one simulation tick.
//!
//! Snapshots are plain data for frontends, replays, and determinism tests.
//! They reference units by stable id, never by ECS entity.

use serde::{Deserialize, Serialize};

use crate::enums::{BattlePhase, TeamId};
use crate::events::{DamageOutcome, FeedbackEvent, HealOutcome};
use crate::types::{Position, SimTime, Vec3};

/// Full state of the battle after one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub time: SimTime,
    pub phase: BattlePhase,
    /// All units, corpses included, sorted by unit id.
    pub units: Vec<UnitView>,
    pub teams: Vec<TeamView>,
    /// Presentation cues emitted this tick.
    pub feedback: Vec<FeedbackEvent>,
    /// Damage applications committed this tick.
    pub damage: Vec<DamageOutcome>,
    /// Heal applications committed this tick.
    pub heals: Vec<HealOutcome>,
}

/// One unit as seen by a frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitView {
    pub unit: u32,
    pub team: TeamId,
    pub position: Position,
    pub facing: Vec3,
    pub health: f64,
    pub max_health: f64,
    pub dead: bool,
    pub level: u32,
    pub rank_index: Option<usize>,
    pub kill_count: u32,
    /// Animation blend between idle (0) and full run (1).
    pub move_blend: f64,
    /// True while an attack window is open.
    pub attacking: bool,
    pub target: Option<u32>,
}

/// Per-team aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamView {
    pub team: TeamId,
    pub alive: u32,
    pub kills: u32,
}
