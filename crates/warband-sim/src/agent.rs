//! The combat agent component: per-unit AI state living in the ECS world.
//!
//! Holds the agent's effective stats, its behavior config, and the
//! runtime state machines (attack window, retarget clock, perception LOD).
//! All logic acting on it lives in the systems.

use warband_agent_ai::lod::PerceptionLod;
use warband_agent_ai::steering::CohesionSample;
use warband_core::config::{AgentConfig, ContactSettings};
use warband_core::constants::*;
use warband_core::stats::{Archetype, StatBlock};

/// One in-flight attack swing.
#[derive(Debug, Clone)]
pub struct AttackWindow {
    pub target: u32,
    pub started_at: f64,
    /// When the hit resolves within the window.
    pub hit_at: f64,
    pub ends_at: f64,
    /// Base damage rolled at swing start; crit is rolled at resolution.
    pub pending_damage: f64,
    pub resolved: bool,
}

/// Stuck-detection bookkeeping for smart retargeting.
#[derive(Debug, Clone)]
pub struct RetargetState {
    pub next_check_at: f64,
    pub last_progress_at: f64,
}

impl RetargetState {
    pub fn new(now: f64) -> Self {
        Self {
            next_check_at: now,
            last_progress_at: now,
        }
    }

    /// Reset the clock for a freshly acquired target.
    pub fn on_new_target(&mut self, now: f64, interval: f64) {
        self.next_check_at = now + interval;
        self.last_progress_at = now;
    }
}

/// AI state of one combat unit.
#[derive(Debug, Clone)]
pub struct CombatAgent {
    pub config: AgentConfig,
    /// Effective stats at the current level and rank.
    pub stats: StatBlock,
    /// Progression tables this unit was spawned from.
    pub archetype: Archetype,

    pub target: Option<u32>,
    /// Fixed orbit direction, +1 or -1, rolled at spawn.
    pub orbit_sign: f64,
    /// Orbit ring radius with the per-unit jitter baked in.
    pub orbit_radius: f64,
    /// Earliest time the next swing may start.
    pub ready_at: f64,

    pub attack: Option<AttackWindow>,
    pub retarget: RetargetState,
    pub lod: PerceptionLod,
    /// Last cohesion sample, refreshed by the movement system.
    pub cohesion: CohesionSample,
    /// Animation blend between idle (0) and full run (1).
    pub move_blend: f64,
}

impl CombatAgent {
    /// Contact filters in effect for this agent.
    pub fn contact<'a>(&'a self, defaults: &'a ContactSettings) -> &'a ContactSettings {
        if self.config.override_contact {
            &self.config.contact
        } else {
            defaults
        }
    }

    /// Duration of one full attack window in seconds. The cooldown runs
    /// concurrently with the window, so this is also the swing period.
    pub fn attack_window_secs(&self) -> f64 {
        1.0 / self.stats.attack_speed.max(MIN_ATTACK_SPEED)
    }

    /// Radius at which the agent stops approaching and may swing.
    pub fn stop_radius(&self) -> f64 {
        self.stats.stop_distance.max(MIN_STOP_DISTANCE)
    }

    /// Reach for resolving a hit (stop radius plus tolerance, so a hit
    /// can still land on a target drifting along the orbit ring).
    pub fn hit_reach(&self) -> f64 {
        self.stop_radius() + EXTRA_HIT_RANGE
    }
}
