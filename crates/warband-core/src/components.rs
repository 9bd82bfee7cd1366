//! ECS components shared across the simulation.
//!
//! Components are plain data structs; game logic lives in systems.

use serde::{Deserialize, Serialize};

use crate::enums::TeamId;
use crate::types::Vec3;

/// Stable numeric identity of a unit, assigned by the engine at spawn.
/// Events and snapshots reference units by this id, not by ECS entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Team affiliation marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team(pub TeamId);

/// Ground-plane facing direction (normalized).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Facing {
    pub forward: Vec3,
}

impl Default for Facing {
    fn default() -> Self {
        Self { forward: Vec3::Z }
    }
}

impl Facing {
    /// Turn toward `dir` by fraction `t` (lerp-and-renormalize).
    /// A zero `dir` leaves the facing unchanged.
    pub fn turn_toward(&mut self, dir: Vec3, t: f64) {
        if dir.length_squared() < 1e-8 {
            return;
        }
        let target = dir.normalize();
        let blended = self.forward.lerp(target, t.clamp(0.0, 1.0));
        if blended.length_squared() > 1e-8 {
            self.forward = blended.normalize();
        } else {
            self.forward = target;
        }
    }
}

/// Live health and progression state of a unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitVitals {
    pub current_health: f64,
    pub max_health: f64,
    pub dead: bool,
    /// Simulation time of death, for corpse cleanup.
    pub died_at: Option<f64>,
    pub kill_count: u32,
    pub level: u32,
    pub rank_index: Option<usize>,
}

impl UnitVitals {
    pub fn new(max_health: u32) -> Self {
        Self {
            current_health: max_health as f64,
            max_health: max_health as f64,
            dead: false,
            died_at: None,
            kill_count: 0,
            level: 1,
            rank_index: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.dead && self.current_health > 0.0
    }

    /// Subtract health; returns true on the transition to dead.
    pub fn take_damage(&mut self, amount: f64, now: f64) -> bool {
        if self.dead {
            return false;
        }
        self.current_health -= amount;
        if self.current_health <= 0.0 {
            self.current_health = 0.0;
            self.dead = true;
            self.died_at = Some(now);
            return true;
        }
        false
    }

    /// Add health clamped at max; returns the amount actually restored.
    pub fn heal(&mut self, amount: f64) -> f64 {
        if self.dead || amount <= 0.0 {
            return 0.0;
        }
        let before = self.current_health;
        self.current_health = (self.current_health + amount).min(self.max_health);
        (self.current_health - before).max(0.0)
    }
}
