//! Fundamental geometric and simulation types.

use serde::{Deserialize, Serialize};

/// 3D vector in simulation space (meters).
/// x/z span the ground plane, y = up.
pub type Vec3 = glam::DVec3;

/// World position component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec3);

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(Vec3::new(x, y, z))
    }

    /// Full 3D distance to another position (meters).
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.0.distance(other.0)
    }

    /// Distance in the ground plane (ignoring height).
    pub fn ground_distance_to(&self, other: &Position) -> f64 {
        flatten(other.0 - self.0).length()
    }

    /// Normalized ground-plane direction to another position.
    /// Zero vector when the positions (nearly) coincide.
    pub fn ground_direction_to(&self, other: &Position) -> Vec3 {
        let delta = flatten(other.0 - self.0);
        if delta.length_squared() < 1e-8 {
            Vec3::ZERO
        } else {
            delta.normalize()
        }
    }
}

/// Project a vector onto the ground plane (zero out the vertical component).
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Right-hand perpendicular of a ground-plane vector (lateral direction).
pub fn perp_right(v: Vec3) -> Vec3 {
    Vec3::new(v.z, 0.0, -v.x)
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Seconds per tick at the fixed tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}
