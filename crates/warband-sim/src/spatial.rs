//! Spatial queries: neighbor gathering and line-of-sight blocking.

use hecs::World;

use warband_core::enums::TeamId;
use warband_core::types::{Position, Vec3};

use crate::roster::UnitRoster;

/// A static sphere that blocks line of sight.
#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    pub radius: f64,
}

/// Positions of all alive units on `team`. The caller's own position is
/// in the list; the steering sensors skip near-zero offsets themselves.
pub fn team_positions(world: &World, roster: &UnitRoster, team: TeamId) -> Vec<Vec3> {
    let mut positions = Vec::with_capacity(roster.alive_count(team));
    for &(_, entity) in roster.alive_of(team) {
        if let Ok(pos) = world.get::<&Position>(entity) {
            positions.push(pos.0);
        }
    }
    positions
}

/// Collect all obstacle spheres once per tick.
pub fn obstacle_spheres(world: &World) -> Vec<(Vec3, f64)> {
    world
        .query::<(&Position, &Obstacle)>()
        .iter()
        .map(|(_, (pos, obstacle))| (pos.0, obstacle.radius))
        .collect()
}

/// True when the segment `from` -> `to` passes through any sphere.
pub fn segment_blocked(spheres: &[(Vec3, f64)], from: Vec3, to: Vec3) -> bool {
    let dir = to - from;
    let len_sq = dir.length_squared();
    for &(center, radius) in spheres {
        let t = if len_sq < 1e-12 {
            0.0
        } else {
            ((center - from).dot(dir) / len_sq).clamp(0.0, 1.0)
        };
        let closest = from + dir * t;
        if (center - closest).length_squared() <= radius * radius {
            return true;
        }
    }
    false
}
