//! Attack windows and hit resolution.
//!
//! A swing opens when the agent is off cooldown and its target is
//! inside the stop radius; opening one claims the occupancy slot on the
//! target and starts the next cooldown, so the swing period equals the
//! window duration. The hit resolves partway through the window; at
//! that moment the gates run in order: target alive, reach, front arc,
//! line of sight, miss roll. A surviving hit rolls its crit and becomes
//! a damage request for the end-of-tick flush. Base damage is rolled at
//! swing start so the outcome is fixed no matter what happens mid-swing.

use std::collections::{HashMap, VecDeque};

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use warband_core::components::{Facing, UnitId, UnitVitals};
use warband_core::config::ContactSettings;
use warband_core::constants::*;
use warband_core::enums::{DamageType, PopupColor, TeamId};
use warband_core::events::FeedbackEvent;
use warband_core::types::{flatten, Position, Vec3};

use crate::agent::{AttackWindow, CombatAgent};
use crate::events::{DamageRequest, EventSink};
use crate::occupancy::OccupancyTracker;
use crate::roster::UnitRoster;
use crate::spatial;

#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    roster: &UnitRoster,
    occupancy: &mut OccupancyTracker,
    rng: &mut ChaCha8Rng,
    now: f64,
    contact_defaults: &ContactSettings,
    damage_queue: &mut VecDeque<DamageRequest>,
    sink: &mut EventSink,
) {
    let spheres = spatial::obstacle_spheres(world);

    let mut unit_positions: HashMap<u32, Vec3> = HashMap::new();
    for team in [TeamId::Red, TeamId::Blue] {
        for &(unit, entity) in roster.alive_of(team) {
            if let Ok(position) = world.get::<&Position>(entity) {
                unit_positions.insert(unit, position.0);
            }
        }
    }

    for (_entity, (id, position, facing, vitals, agent)) in
        world.query_mut::<(&UnitId, &Position, &Facing, &UnitVitals, &mut CombatAgent)>()
    {
        if !vitals.is_alive() {
            agent.attack = None;
            continue;
        }

        // Advance an open window.
        if let Some(mut window) = agent.attack.take() {
            if !window.resolved && now >= window.hit_at {
                window.resolved = true;
                let landed = resolve_hit(
                    id.0,
                    position.0,
                    facing,
                    agent,
                    &window,
                    &unit_positions,
                    &spheres,
                    contact_defaults,
                    rng,
                    damage_queue,
                    sink,
                );
                if landed {
                    // A landed hit counts as progress for the stuck clock.
                    agent.retarget.last_progress_at = now;
                }
            }
            if now < window.ends_at {
                agent.attack = Some(window);
                continue;
            }
            // Window over; fall through so the next swing can start on
            // this same tick and the period stays one window length.
        }

        // Try to open a new window.
        if now < agent.ready_at {
            continue;
        }
        let Some(target) = agent.target else { continue };
        let Some(&target_pos) = unit_positions.get(&target) else {
            continue;
        };
        if flatten(target_pos - position.0).length() > agent.stop_radius() {
            continue;
        }

        // Committing to the swing is what takes the occupancy slot.
        occupancy.claim(id.0, target);

        let duration = agent.attack_window_secs();
        let damage = rng.gen_range(agent.stats.damage_min..=agent.stats.damage_max) as f64;
        agent.ready_at = now + duration;
        agent.attack = Some(AttackWindow {
            target,
            started_at: now,
            hit_at: now + duration * HIT_TIME_NORMALIZED,
            ends_at: now + duration,
            pending_damage: damage,
            resolved: false,
        });
        sink.feedback.push(FeedbackEvent::AttackSwing { unit: id.0 });
    }
}

/// Run the hit gates; a surviving hit rolls its crit and is queued for
/// the damage flush. Returns whether the hit landed. A target that died
/// mid-swing whiffs silently; every other failed gate shows a miss
/// popup at the target.
#[allow(clippy::too_many_arguments)]
fn resolve_hit(
    attacker: u32,
    position: Vec3,
    facing: &Facing,
    agent: &CombatAgent,
    window: &AttackWindow,
    unit_positions: &HashMap<u32, Vec3>,
    spheres: &[(Vec3, f64)],
    contact_defaults: &ContactSettings,
    rng: &mut ChaCha8Rng,
    damage_queue: &mut VecDeque<DamageRequest>,
    sink: &mut EventSink,
) -> bool {
    let Some(&target_pos) = unit_positions.get(&window.target) else {
        return false;
    };

    let to_target = flatten(target_pos - position);
    let dist = to_target.length();
    if dist > agent.hit_reach() {
        miss_popup(sink, target_pos);
        return false;
    }

    let contact = agent.contact(contact_defaults);
    if contact.use_front_arc && dist > 1e-6 {
        let cos_half = (contact.front_arc_angle_deg.to_radians() * 0.5).cos();
        if facing.forward.dot(to_target / dist) < cos_half {
            miss_popup(sink, target_pos);
            return false;
        }
    }
    if contact.use_los {
        let from = position + Vec3::Y * contact.los_ray_height;
        let to = target_pos + Vec3::Y * LOS_TORSO_HEIGHT;
        if spatial::segment_blocked(spheres, from, to) {
            miss_popup(sink, target_pos);
            return false;
        }
    }

    if agent.stats.miss_chance > 0.0 && rng.gen::<f64>() < agent.stats.miss_chance {
        miss_popup(sink, target_pos);
        return false;
    }

    let mut damage = window.pending_damage;
    let crit = agent.stats.crit_chance > 0.0 && rng.gen::<f64>() < agent.stats.crit_chance;
    if crit {
        damage *= agent.stats.crit_multiplier;
    }

    damage_queue.push_back(DamageRequest {
        attacker: Some(attacker),
        target: window.target,
        amount: damage,
        damage_type: DamageType::Physical,
        crit,
        armor_pen_flat: agent.stats.armor_pen_flat,
        armor_pen_pct: agent.stats.armor_pen_pct,
    });
    true
}

fn miss_popup(sink: &mut EventSink, target_pos: Vec3) {
    sink.feedback.push(FeedbackEvent::Popup {
        position: Position(target_pos),
        text: "Miss".into(),
        color: PopupColor::Miss,
    });
}
