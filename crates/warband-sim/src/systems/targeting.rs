//! Target acquisition and smart retargeting.
//!
//! Picks targets through the occupancy-aware selector and re-evaluates
//! on the retarget cadence when an agent is stuck (no approach progress)
//! or has strayed too far from its pack. Occupancy slots are taken by
//! the attack system when a swing actually starts; this pass only
//! releases them when an agent drops or switches its target.

use hecs::World;

use warband_agent_ai::steering::isolation;
use warband_agent_ai::targeting::{
    bias_strength, select_target_biased, CentroidBias, TargetCandidate,
};
use warband_core::components::{Team, UnitId, UnitVitals};
use warband_core::constants::*;
use warband_core::enums::TeamId;
use warband_core::types::{flatten, Position, Vec3};

use crate::agent::CombatAgent;
use crate::occupancy::OccupancyTracker;
use crate::roster::UnitRoster;

pub fn run(world: &mut World, roster: &UnitRoster, occupancy: &mut OccupancyTracker, now: f64) {
    // Alive enemies for each side, gathered once.
    let mut enemy_pool: [Vec<(u32, Vec3)>; TeamId::COUNT] = Default::default();
    for team in [TeamId::Red, TeamId::Blue] {
        let pool = &mut enemy_pool[team.opponent().index()];
        for &(unit, entity) in roster.alive_of(team) {
            if let Ok(position) = world.get::<&Position>(entity) {
                pool.push((unit, position.0));
            }
        }
    }

    for (_entity, (id, team, position, vitals, agent)) in
        world.query_mut::<(&UnitId, &Team, &Position, &UnitVitals, &mut CombatAgent)>()
    {
        if !vitals.is_alive() {
            if agent.target.take().is_some() {
                occupancy.release(id.0);
            }
            continue;
        }

        let pool = &enemy_pool[team.0.index()];
        if pool.is_empty() {
            agent.target = None;
            occupancy.release(id.0);
            continue;
        }

        // Approach progress toward the current target feeds the stuck
        // clock: being at (or near) the stop radius is progress.
        let mut stuck = false;
        if let Some(current) = agent.target {
            match pool.iter().find(|&&(unit, _)| unit == current) {
                Some(&(_, target_pos)) => {
                    let dist = flatten(target_pos - position.0).length();
                    if dist <= agent.stop_radius() + PROGRESS_EPSILON {
                        agent.retarget.last_progress_at = now;
                    }
                    stuck =
                        now - agent.retarget.last_progress_at >= agent.config.retarget_after_stuck;
                }
                None => {
                    // Target died or left the field.
                    agent.target = None;
                    occupancy.release(id.0);
                }
            }
        }

        let iso = isolation(
            &agent.cohesion,
            agent.config.isolation_threshold,
            agent.config.cohesion_radius,
        );
        let isolated = iso >= agent.config.isolation_retarget_threshold;

        let needs_pick = agent.target.is_none();
        let due = now >= agent.retarget.next_check_at;
        if !needs_pick && !due {
            continue;
        }
        if due {
            agent.retarget.next_check_at = now + agent.config.retarget_check_interval;
        }
        if !needs_pick && !(stuck || isolated) {
            continue;
        }

        // Every living opponent is a candidate. Current target goes
        // first so score ties keep it.
        let mut candidates: Vec<(u32, TargetCandidate)> = pool
            .iter()
            .map(|&(unit, pos)| (unit, candidate(occupancy, id.0, unit, pos)))
            .collect();
        if let Some(current) = agent.target {
            if let Some(index) = candidates.iter().position(|&(unit, _)| unit == current) {
                candidates.swap(0, index);
            }
        }

        // Only a stuck/isolated re-pick pulls toward the pack; initial
        // acquisition goes purely by distance and crowding.
        let bias = if !needs_pick && agent.cohesion.count > 0 {
            Some(CentroidBias {
                centroid: position.0
                    + agent.cohesion.direction * agent.cohesion.centroid_distance,
                strength: bias_strength(&agent.config, iso),
            })
        } else {
            None
        };

        let scored: Vec<TargetCandidate> = candidates.iter().map(|&(_, c)| c).collect();
        if let Some(index) = select_target_biased(position.0, &scored, bias.as_ref()) {
            let picked = candidates[index].0;
            if agent.target != Some(picked) {
                // The slot on the old target frees up now; the new one
                // is only taken once a swing starts.
                occupancy.release(id.0);
                agent.target = Some(picked);
                agent
                    .retarget
                    .on_new_target(now, agent.config.retarget_check_interval);
            }
        }
    }
}

/// Candidate view of one enemy, with the caller's own claim excluded
/// from the occupancy count so keeping a target is never penalized.
fn candidate(
    occupancy: &OccupancyTracker,
    attacker: u32,
    unit: u32,
    position: Vec3,
) -> TargetCandidate {
    let mut count = occupancy.count(unit);
    if occupancy.claim_of(attacker) == Some(unit) {
        count = count.saturating_sub(1);
    }
    TargetCandidate {
        position,
        occupancy: count,
    }
}
