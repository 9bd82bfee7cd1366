//! Movement: steering composition, position integration, ground snap,
//! facing, and the animation move-blend value.

use std::collections::HashMap;

use hecs::World;
use rand_chacha::ChaCha8Rng;

use warband_agent_ai::steering::{self, steer, SteeringContext};
use warband_core::components::{Facing, Team, UnitVitals};
use warband_core::constants::*;
use warband_core::enums::TeamId;
use warband_core::types::{flatten, Position, Vec3};

use crate::agent::CombatAgent;
use crate::roster::UnitRoster;
use crate::spatial;

pub fn run(
    world: &mut World,
    roster: &UnitRoster,
    rng: &mut ChaCha8Rng,
    now: f64,
    dt: f64,
    ground_height: f64,
) {
    // Ally positions per team and a unit -> position lookup, gathered once.
    let team_allies = [
        spatial::team_positions(world, roster, TeamId::Red),
        spatial::team_positions(world, roster, TeamId::Blue),
    ];
    let mut unit_positions: HashMap<u32, Vec3> = HashMap::new();
    for team in [TeamId::Red, TeamId::Blue] {
        for &(unit, entity) in roster.alive_of(team) {
            if let Ok(position) = world.get::<&Position>(entity) {
                unit_positions.insert(unit, position.0);
            }
        }
    }

    for (_entity, (team, vitals, agent, position, facing)) in
        world.query_mut::<(&Team, &UnitVitals, &mut CombatAgent, &mut Position, &mut Facing)>()
    {
        if !vitals.is_alive() {
            agent.move_blend = approach(agent.move_blend, 0.0, MOVE_BLEND_SPEED * dt);
            continue;
        }

        let target_pos = agent.target.and_then(|t| unit_positions.get(&t).copied());
        let Some(target_pos) = target_pos else {
            agent.move_blend = approach(agent.move_blend, 0.0, MOVE_BLEND_SPEED * dt);
            continue;
        };

        let allies: &[Vec3] = &team_allies[team.0.index()];
        let pos = position.0;
        let target_distance = flatten(target_pos - pos).length();
        let config = agent.config.clone();
        let orbit_sign = agent.orbit_sign;

        let separation_push = agent.lod.separation(now, &config.lod, target_distance, rng, || {
            steering::separation(pos, allies, config.separation_radius)
        });
        let bypass_push = agent.lod.bypass(now, &config.lod, target_distance, rng, || {
            steering::bypass(
                pos,
                target_pos - pos,
                allies,
                config.bypass_ahead_distance,
                orbit_sign,
            )
        });
        let cohesion = agent.lod.cohesion(now, &config.lod, target_distance, rng, || {
            steering::cohesion_sample(pos, allies, config.cohesion_radius)
        });
        agent.cohesion = cohesion;

        let out = steer(&SteeringContext {
            position: pos,
            target_position: target_pos,
            move_speed: agent.stats.move_speed,
            stop_radius: agent.stop_radius(),
            orbit_radius: agent.orbit_radius,
            orbit_sign,
            separation_push,
            bypass_push,
            cohesion,
            config: &config,
        });

        // Agents keep circling mid-swing; the reach tolerance on the
        // hit gate absorbs the drift.
        let velocity = out.velocity;
        position.0 += velocity * dt;

        // Snap toward the ground plane, capped per tick.
        let dy = ground_height - position.0.y;
        let step = (GROUND_SNAP_SPEED * dt).min(GROUND_SNAP_MAX);
        position.0.y += dy.clamp(-step, step);

        facing.turn_toward(out.face_dir, (TURN_SPEED * dt).min(1.0));

        let speed_frac = if agent.stats.move_speed > 1e-6 {
            (velocity.length() / agent.stats.move_speed).clamp(0.0, 1.0)
        } else {
            0.0
        };
        agent.move_blend = approach(agent.move_blend, speed_frac, MOVE_BLEND_SPEED * dt);
    }
}

fn approach(current: f64, target: f64, max_step: f64) -> f64 {
    current + (target - current).clamp(-max_step, max_step)
}
