//! Battle engine — the core of the simulation.
//!
//! `BattleEngine` owns the hecs ECS world, the roster and occupancy
//! trackers, and the damage/heal queues; it runs all systems each tick
//! and produces `BattleSnapshot`s. Completely headless, enabling
//! deterministic testing: same seed and same call sequence, same battle.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use warband_core::components::{Team, UnitVitals};
use warband_core::config::{AgentConfig, ContactSettings, Viewport};
use warband_core::constants::DT;
use warband_core::enums::{BattlePhase, DamageType, TeamId};
use warband_core::events::FeedbackEvent;
use warband_core::state::BattleSnapshot;
use warband_core::stats::Archetype;
use warband_core::types::{Position, SimTime};

use crate::agent::CombatAgent;
use crate::events::{DamageRequest, EventSink, HealRequest};
use crate::systems::damage::FlushOrder;
use crate::occupancy::OccupancyTracker;
use crate::roster::UnitRoster;
use crate::systems;
use crate::world_setup;

/// Configuration for starting a new battle.
pub struct BattleConfig {
    /// RNG seed for determinism. Same seed = same battle.
    pub seed: u64,
    /// Shared contact-filter defaults. `None` falls back to built-ins
    /// (with a one-shot warning, since that is usually a setup mistake).
    pub contact: Option<ContactSettings>,
    /// Viewport for the manual visibility fallback. `None` means every
    /// agent counts as on-screen.
    pub viewport: Option<Viewport>,
    /// Height of the (flat) ground plane.
    pub ground_height: f64,
    /// Which category the end-of-tick flush drains first.
    pub flush_order: FlushOrder,
    /// Behavior tunables handed to every spawned unit.
    pub agent: AgentConfig,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            contact: None,
            viewport: None,
            ground_height: 0.0,
            flush_order: FlushOrder::default(),
            agent: AgentConfig::default(),
        }
    }
}

/// The battle engine. Owns the ECS world and all sim state.
pub struct BattleEngine {
    world: World,
    time: SimTime,
    phase: BattlePhase,
    rng: ChaCha8Rng,
    next_unit_id: u32,
    roster: UnitRoster,
    occupancy: OccupancyTracker,
    contact_defaults: ContactSettings,
    viewport: Option<Viewport>,
    ground_height: f64,
    flush_order: FlushOrder,
    agent_defaults: AgentConfig,
    damage_queue: VecDeque<DamageRequest>,
    heal_queue: VecDeque<HealRequest>,
    despawn_buffer: Vec<(hecs::Entity, u32)>,
    sink: EventSink,
}

impl BattleEngine {
    /// Create a new battle engine with the given config.
    pub fn new(config: BattleConfig) -> Self {
        let contact_defaults = match config.contact {
            Some(contact) => contact,
            None => {
                tracing::warn!("no contact defaults installed; using built-in settings");
                ContactSettings::default()
            }
        };
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: BattlePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            next_unit_id: 0,
            roster: UnitRoster::default(),
            occupancy: OccupancyTracker::default(),
            contact_defaults,
            viewport: config.viewport,
            ground_height: config.ground_height,
            flush_order: config.flush_order,
            agent_defaults: config.agent,
            damage_queue: VecDeque::new(),
            heal_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            sink: EventSink::default(),
        }
    }

    /// Spawn a unit at level 1 and register it with the roster.
    /// Returns the unit's stable id.
    pub fn spawn_unit(&mut self, team: TeamId, archetype: &Archetype, position: Position) -> u32 {
        let unit = self.next_unit_id;
        self.next_unit_id += 1;
        let entity = world_setup::spawn_unit(
            &mut self.world,
            &mut self.rng,
            unit,
            team,
            archetype,
            &self.agent_defaults,
            position,
            self.time.elapsed_secs,
        );
        self.roster.register(unit, entity, team);
        unit
    }

    /// Spawn a static line-of-sight blocker.
    pub fn spawn_obstacle(&mut self, position: Position, radius: f64) {
        world_setup::spawn_obstacle(&mut self.world, position, radius);
    }

    /// Remove a unit from the battle immediately: roster and occupancy
    /// entries are released and the entity despawns without a death event.
    pub fn deactivate_unit(&mut self, unit: u32) {
        let Some(entity) = self.roster.entity(unit) else {
            return;
        };
        if let Ok(team) = self.world.get::<&Team>(entity).map(|t| t.0) {
            self.roster.mark_dead(unit, team);
        }
        self.roster.forget(unit);
        self.occupancy.release(unit);
        self.occupancy.clear_target(unit);
        let _ = self.world.despawn(entity);
    }

    /// Begin simulating. Units may be spawned before or after.
    pub fn start(&mut self) {
        if self.phase == BattlePhase::Idle {
            self.phase = BattlePhase::Active;
        }
    }

    pub fn pause(&mut self) {
        if self.phase == BattlePhase::Active {
            self.phase = BattlePhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == BattlePhase::Paused {
            self.phase = BattlePhase::Active;
        }
    }

    /// Queue damage for the next flush. External requests carry no
    /// penetration; unit attacks queue theirs through the attack system.
    pub fn submit_damage(
        &mut self,
        attacker: Option<u32>,
        target: u32,
        amount: f64,
        damage_type: DamageType,
    ) {
        self.damage_queue.push_back(DamageRequest {
            attacker,
            target,
            amount,
            damage_type,
            crit: false,
            armor_pen_flat: 0.0,
            armor_pen_pct: 0.0,
        });
    }

    /// Queue a heal for the next flush.
    pub fn submit_heal(&mut self, healer: Option<u32>, target: u32, amount: f64) {
        self.heal_queue.push_back(HealRequest {
            healer,
            target,
            amount,
        });
    }

    /// Apply damage immediately, bypassing the queue. Resolution runs the
    /// same defense rolls as the flush; a resulting death is processed
    /// before this returns.
    pub fn apply_damage_now(
        &mut self,
        attacker: Option<u32>,
        target: u32,
        amount: f64,
        damage_type: DamageType,
    ) {
        systems::damage::apply_damage(
            &mut self.world,
            &self.roster,
            &mut self.rng,
            self.time.elapsed_secs,
            DamageRequest {
                attacker,
                target,
                amount,
                damage_type,
                crit: false,
                armor_pen_flat: 0.0,
                armor_pen_pct: 0.0,
            },
            &mut self.sink,
        );
        self.process_deaths();
    }

    /// Apply a heal immediately, bypassing the queue.
    pub fn apply_heal_now(&mut self, healer: Option<u32>, target: u32, amount: f64) {
        systems::damage::apply_heal(
            &mut self.world,
            &self.roster,
            HealRequest {
                healer,
                target,
                amount,
            },
            &mut self.sink,
        );
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> BattleSnapshot {
        if self.phase == BattlePhase::Active {
            self.run_systems();
            self.time.advance();
        }

        let feedback = std::mem::take(&mut self.sink.feedback);
        let damage = std::mem::take(&mut self.sink.damage);
        let heals = std::mem::take(&mut self.sink.heals);
        systems::snapshot::build(&self.world, &self.time, self.phase, feedback, damage, heals)
    }

    /// Get the current battle phase.
    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get a read-only reference to the unit roster.
    pub fn roster(&self) -> &UnitRoster {
        &self.roster
    }

    #[cfg(test)]
    pub fn occupancy(&self) -> &OccupancyTracker {
        &self.occupancy
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let now = self.time.elapsed_secs;

        // 1. Manual visibility checks feed the perception LOD
        systems::perception::run(&mut self.world, self.viewport.as_ref(), now);
        // 2. Target acquisition and smart retargeting
        systems::targeting::run(&mut self.world, &self.roster, &mut self.occupancy, now);
        // 3. Steering, integration, ground snap, facing, move blend
        systems::movement::run(
            &mut self.world,
            &self.roster,
            &mut self.rng,
            now,
            DT,
            self.ground_height,
        );
        // 4. Attack windows and hit gates (claims occupancy, queues damage)
        systems::attack::run(
            &mut self.world,
            &self.roster,
            &mut self.occupancy,
            &mut self.rng,
            now,
            &self.contact_defaults,
            &mut self.damage_queue,
            &mut self.sink,
        );
        // 5. Passive regeneration
        systems::damage::run_regen(&mut self.world, DT);
        // 6. Damage/heal flush (the only place health changes)
        systems::damage::flush(
            &mut self.world,
            &self.roster,
            &mut self.rng,
            now,
            self.flush_order,
            &mut self.damage_queue,
            &mut self.heal_queue,
            &mut self.sink,
        );
        // 7. Death bookkeeping: roster, occupancy, kill credit, promotion
        self.process_deaths();
        // 8. Corpse despawn and occupancy sweep
        systems::cleanup::run(
            &mut self.world,
            &mut self.roster,
            &mut self.occupancy,
            &mut self.despawn_buffer,
            now,
            self.time.tick,
        );
    }

    /// Handle deaths recorded by the flush: release the victim's
    /// occupancy both ways, credit the killer, and end the battle once
    /// a side is wiped out.
    fn process_deaths(&mut self) {
        let deaths = std::mem::take(&mut self.sink.deaths);
        if deaths.is_empty() {
            return;
        }

        for death in deaths {
            if let Some(entity) = self.roster.entity(death.target) {
                if let Ok(team) = self.world.get::<&Team>(entity).map(|t| t.0) {
                    self.roster.mark_dead(death.target, team);
                    tracing::debug!(unit = death.target, ?team, "unit died");
                    self.sink.feedback.push(FeedbackEvent::UnitDied {
                        unit: death.target,
                        team,
                    });
                }
            }
            self.occupancy.release(death.target);
            self.occupancy.clear_target(death.target);

            let Some(attacker) = death.attacker else {
                continue;
            };
            if !self.roster.is_alive(attacker) {
                continue;
            }
            self.credit_kill(attacker);
        }

        if self.roster.alive_count(TeamId::Red) == 0 || self.roster.alive_count(TeamId::Blue) == 0
        {
            self.phase = BattlePhase::Idle;
        }
    }

    /// Bump the killer's count, cue the cry, and promote if a rank
    /// threshold was crossed.
    fn credit_kill(&mut self, attacker: u32) {
        let Some(entity) = self.roster.entity(attacker) else {
            return;
        };

        let (kills, level, current_rank) = {
            let Ok(mut vitals) = self.world.get::<&mut UnitVitals>(entity) else {
                return;
            };
            vitals.kill_count += 1;
            (vitals.kill_count, vitals.level, vitals.rank_index)
        };
        self.sink
            .feedback
            .push(FeedbackEvent::VictoryCry { unit: attacker });

        let (new_rank, stats, rank_name) = {
            let Ok(agent) = self.world.get::<&CombatAgent>(entity) else {
                return;
            };
            let new_rank = agent.archetype.rank_for_kills(kills);
            if new_rank <= current_rank {
                return;
            }
            let name = match new_rank.and_then(|i| agent.archetype.ranks.get(i)) {
                Some(rank) => rank.name.clone(),
                None => return,
            };
            (new_rank, agent.archetype.stats_at(level, new_rank), name)
        };

        let new_max = stats.health as f64;
        if let Ok(mut agent) = self.world.get::<&mut CombatAgent>(entity) {
            agent.stats = stats;
        }
        if let Ok(mut vitals) = self.world.get::<&mut UnitVitals>(entity) {
            vitals.rank_index = new_rank;
            // Max health growth is granted as current health too.
            let delta = new_max - vitals.max_health;
            vitals.max_health = new_max;
            if delta > 0.0 {
                vitals.current_health += delta;
            }
            vitals.current_health = vitals.current_health.min(new_max);
        }
        tracing::debug!(unit = attacker, rank = %rank_name, "rank promotion");
        self.sink.feedback.push(FeedbackEvent::RankPromotion {
            unit: attacker,
            rank: rank_name,
        });
    }
}
