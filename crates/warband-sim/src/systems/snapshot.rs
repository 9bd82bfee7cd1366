//! Snapshot system: queries the ECS world and builds a complete BattleSnapshot.
//!
//! This system is read-only — it never modifies the world.

use hecs::World;

use warband_core::components::{Facing, Team, UnitId, UnitVitals};
use warband_core::enums::{BattlePhase, TeamId};
use warband_core::events::{DamageOutcome, FeedbackEvent, HealOutcome};
use warband_core::state::{BattleSnapshot, TeamView, UnitView};
use warband_core::types::{Position, SimTime};

use crate::agent::CombatAgent;

pub fn build(
    world: &World,
    time: &SimTime,
    phase: BattlePhase,
    feedback: Vec<FeedbackEvent>,
    damage: Vec<DamageOutcome>,
    heals: Vec<HealOutcome>,
) -> BattleSnapshot {
    let mut units: Vec<UnitView> = world
        .query::<(&UnitId, &Team, &Position, &Facing, &UnitVitals, &CombatAgent)>()
        .iter()
        .map(|(_, (id, team, position, facing, vitals, agent))| UnitView {
            unit: id.0,
            team: team.0,
            position: *position,
            facing: facing.forward,
            health: vitals.current_health,
            max_health: vitals.max_health,
            dead: vitals.dead,
            level: vitals.level,
            rank_index: vitals.rank_index,
            kill_count: vitals.kill_count,
            move_blend: agent.move_blend,
            attacking: agent.attack.is_some(),
            target: agent.target,
        })
        .collect();
    units.sort_by_key(|u| u.unit);

    let mut teams = [
        TeamView {
            team: TeamId::Red,
            alive: 0,
            kills: 0,
        },
        TeamView {
            team: TeamId::Blue,
            alive: 0,
            kills: 0,
        },
    ];
    for unit in &units {
        let view = &mut teams[unit.team.index()];
        if !unit.dead {
            view.alive += 1;
        }
        view.kills += unit.kill_count;
    }

    BattleSnapshot {
        time: *time,
        phase,
        units,
        teams: teams.to_vec(),
        feedback,
        damage,
        heals,
    }
}
