//! The damage and heal flush — the only place health changes.
//!
//! Requests queued during the tick are applied here in submission order,
//! rolling target-side defenses (evasion, mitigation, block) and
//! recording outcomes, popups, and deaths.

use std::collections::VecDeque;

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use warband_core::components::UnitVitals;
use warband_core::constants::*;
use warband_core::enums::{DamageType, PopupColor};
use warband_core::events::{DamageOutcome, FeedbackEvent, HealOutcome};
use warband_core::types::Position;

use crate::agent::CombatAgent;
use crate::events::{DamageRequest, Death, EventSink, HealRequest};
use crate::roster::UnitRoster;

/// Passive health regeneration, applied directly (no events, no popups).
pub fn run_regen(world: &mut World, dt: f64) {
    for (_entity, (agent, vitals)) in world.query_mut::<(&CombatAgent, &mut UnitVitals)>() {
        if vitals.is_alive() && agent.stats.health_regen > 0.0 {
            vitals.heal(agent.stats.health_regen * dt);
        }
    }
}

/// Which request category the flush drains first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlushOrder {
    #[default]
    DamageFirst,
    HealFirst,
}

/// Apply every queued request, one category at a time, each category in
/// strict submission order.
pub fn flush(
    world: &mut World,
    roster: &UnitRoster,
    rng: &mut ChaCha8Rng,
    now: f64,
    order: FlushOrder,
    damage_queue: &mut VecDeque<DamageRequest>,
    heal_queue: &mut VecDeque<HealRequest>,
    sink: &mut EventSink,
) {
    if order == FlushOrder::HealFirst {
        while let Some(request) = heal_queue.pop_front() {
            apply_heal(world, roster, request, sink);
        }
    }
    while let Some(request) = damage_queue.pop_front() {
        apply_damage(world, roster, rng, now, request, sink);
    }
    while let Some(request) = heal_queue.pop_front() {
        apply_heal(world, roster, request, sink);
    }
}

pub fn apply_damage(
    world: &mut World,
    roster: &UnitRoster,
    rng: &mut ChaCha8Rng,
    now: f64,
    request: DamageRequest,
    sink: &mut EventSink,
) {
    if request.amount <= 0.0 {
        return;
    }
    let Some(entity) = roster.entity(request.target) else {
        return;
    };

    // Target-side defenses. Units without an agent (externally spawned
    // props) take damage unmitigated.
    let (evasion, block_chance, armor, magic_resist) = match world.get::<&CombatAgent>(entity) {
        Ok(agent) => (
            agent.stats.evasion,
            agent.stats.block_chance,
            agent.stats.armor,
            agent.stats.magic_resist,
        ),
        Err(_) => (0.0, 0.0, 0.0, 0.0),
    };
    let position = world
        .get::<&Position>(entity)
        .map(|p| *p)
        .unwrap_or_default();

    let mut evaded = false;
    let mut blocked = false;
    let mut amount = request.amount;

    if evasion > 0.0 && rng.gen::<f64>() < evasion {
        evaded = true;
        amount = 0.0;
    } else {
        amount = mitigate(
            amount,
            request.damage_type,
            armor,
            magic_resist,
            request.armor_pen_flat,
            request.armor_pen_pct,
        );
        // Chip damage guarantee: a connecting hit always costs something.
        if amount < MIN_CHIP_DAMAGE {
            amount = MIN_CHIP_DAMAGE;
        }
        if block_chance > 0.0 && rng.gen::<f64>() < block_chance {
            blocked = true;
            amount *= 1.0 - BLOCK_REDUCTION;
        }
    }

    let died = {
        let Ok(mut vitals) = world.get::<&mut UnitVitals>(entity) else {
            return;
        };
        if !vitals.is_alive() {
            return;
        }
        !evaded && vitals.take_damage(amount, now)
    };

    let (text, color) = if evaded {
        ("Miss".to_string(), PopupColor::Miss)
    } else if request.crit {
        (format!("{:.0}!", amount), PopupColor::Crit)
    } else if blocked {
        (format!("{:.0}", amount), PopupColor::Blocked)
    } else {
        (format!("{:.0}", amount), PopupColor::Damage)
    };
    sink.feedback.push(FeedbackEvent::Popup {
        position,
        text,
        color,
    });
    sink.damage.push(DamageOutcome {
        attacker: request.attacker,
        target: request.target,
        base_amount: request.amount,
        final_amount: amount,
        damage_type: request.damage_type,
        crit: request.crit,
        evaded,
        blocked,
        position,
    });
    if died {
        sink.deaths.push(Death {
            target: request.target,
            attacker: request.attacker,
        });
    }
}

pub fn apply_heal(
    world: &mut World,
    roster: &UnitRoster,
    request: HealRequest,
    sink: &mut EventSink,
) {
    if request.amount <= 0.0 {
        return;
    }
    let Some(entity) = roster.entity(request.target) else {
        return;
    };
    let applied = {
        let Ok(mut vitals) = world.get::<&mut UnitVitals>(entity) else {
            return;
        };
        vitals.heal(request.amount)
    };
    if applied <= 0.0 {
        return;
    }
    let position = world
        .get::<&Position>(entity)
        .map(|p| *p)
        .unwrap_or_default();
    sink.feedback.push(FeedbackEvent::Popup {
        position,
        text: format!("+{:.0}", applied),
        color: PopupColor::Heal,
    });
    sink.heals.push(HealOutcome {
        healer: request.healer,
        target: request.target,
        amount: applied,
        position,
    });
}

/// Mitigate `amount` against the target's defenses. Effective armor or
/// resist is reduced by the attacker's penetration, then soft-capped:
/// reduction = effective / (effective + K).
pub fn mitigate(
    amount: f64,
    damage_type: DamageType,
    armor: f64,
    magic_resist: f64,
    pen_flat: f64,
    pen_pct: f64,
) -> f64 {
    let (resist, k) = match damage_type {
        DamageType::Physical => (armor, ARMOR_K),
        DamageType::Magic => (magic_resist, MAGIC_K),
        DamageType::True => return amount,
    };
    let effective = (resist * (1.0 - pen_pct.clamp(0.0, 1.0)) - pen_flat).max(0.0);
    amount * (1.0 - effective / (effective + k))
}
