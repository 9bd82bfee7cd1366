//! Unit roster: stable id -> entity mapping and per-team alive lists.
//!
//! Kept by the engine and updated at spawn, death, and despawn so
//! systems never have to scan the whole world to find a team.

use std::collections::{HashMap, HashSet};

use hecs::Entity;

use warband_core::enums::TeamId;

#[derive(Debug, Default)]
pub struct UnitRoster {
    by_id: HashMap<u32, Entity>,
    alive_ids: HashSet<u32>,
    teams: [Vec<(u32, Entity)>; TeamId::COUNT],
}

impl UnitRoster {
    /// Idempotent: re-registering a known unit is a no-op.
    pub fn register(&mut self, unit: u32, entity: Entity, team: TeamId) {
        if self.by_id.contains_key(&unit) {
            return;
        }
        self.by_id.insert(unit, entity);
        self.alive_ids.insert(unit);
        self.teams[team.index()].push((unit, entity));
    }

    /// Remove a unit from the alive lists; the id stays resolvable until
    /// `forget` (so corpses can still be looked up).
    pub fn mark_dead(&mut self, unit: u32, team: TeamId) {
        self.alive_ids.remove(&unit);
        self.teams[team.index()].retain(|&(id, _)| id != unit);
    }

    /// Drop a unit entirely, typically at corpse despawn.
    pub fn forget(&mut self, unit: u32) {
        self.by_id.remove(&unit);
        self.alive_ids.remove(&unit);
        for team in &mut self.teams {
            team.retain(|&(id, _)| id != unit);
        }
    }

    pub fn entity(&self, unit: u32) -> Option<Entity> {
        self.by_id.get(&unit).copied()
    }

    pub fn is_alive(&self, unit: u32) -> bool {
        self.alive_ids.contains(&unit)
    }

    /// Alive units of one team, in registration order.
    pub fn alive_of(&self, team: TeamId) -> &[(u32, Entity)] {
        &self.teams[team.index()]
    }

    pub fn alive_count(&self, team: TeamId) -> usize {
        self.teams[team.index()].len()
    }
}
