//! Entity spawn factories.
//!
//! All per-unit randomness (orbit side, orbit radius jitter, first-swing
//! stagger, LOD stagger) is rolled here from the engine RNG, so two
//! engines with the same seed spawn identical units.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use warband_agent_ai::lod::PerceptionLod;
use warband_agent_ai::steering::CohesionSample;
use warband_core::components::{Facing, Team, UnitId, UnitVitals};
use warband_core::config::AgentConfig;
use warband_core::constants::*;
use warband_core::enums::TeamId;
use warband_core::stats::Archetype;
use warband_core::types::Position;

use crate::agent::{CombatAgent, RetargetState};
use crate::spatial::Obstacle;

/// Spawn one combat unit at level 1 with no rank.
#[allow(clippy::too_many_arguments)]
pub fn spawn_unit(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    unit: u32,
    team: TeamId,
    archetype: &Archetype,
    defaults: &AgentConfig,
    position: Position,
    now: f64,
) -> hecs::Entity {
    let stats = archetype.stats_at(1, None);
    let config = defaults.clone();

    let orbit_sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    let stop_radius = stats.stop_distance.max(MIN_STOP_DISTANCE);
    let orbit_radius =
        (stop_radius + symmetric(rng, config.orbit_radius_jitter)).max(MIN_ORBIT_RADIUS);
    // Stagger the first swing and the first retarget check so identical
    // units do not act in lockstep.
    let window = 1.0 / stats.attack_speed.max(MIN_ATTACK_SPEED);
    let ready_at = now + rng.gen_range(0.0..window);
    let mut retarget = RetargetState::new(now);
    retarget.next_check_at = now + rng.gen_range(0.0..config.retarget_check_interval.max(1e-6));
    let lod = PerceptionLod::new(now, rng);

    let vitals = UnitVitals::new(stats.health);
    let agent = CombatAgent {
        config,
        stats,
        archetype: archetype.clone(),
        target: None,
        orbit_sign,
        orbit_radius,
        ready_at,
        attack: None,
        retarget,
        lod,
        cohesion: CohesionSample::default(),
        move_blend: 0.0,
    };

    world.spawn((
        UnitId(unit),
        Team(team),
        position,
        Facing::default(),
        vitals,
        agent,
    ))
}

/// Spawn a static sphere that blocks line of sight.
pub fn spawn_obstacle(world: &mut World, position: Position, radius: f64) -> hecs::Entity {
    world.spawn((position, Obstacle { radius }))
}

fn symmetric(rng: &mut ChaCha8Rng, span: f64) -> f64 {
    if span > 0.0 {
        rng.gen_range(-span..=span)
    } else {
        0.0
    }
}
