//! Unit stat model: stat blocks, bonuses, and level/rank progression.
//!
//! A `StatBlock` is plain data; it doubles as a bonus carrier (flat
//! bonuses add field-wise, percent bonuses multiply field-wise).

use serde::{Deserialize, Serialize};

/// Full set of numeric characteristics for one combat unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    // --- Offense ---
    /// Minimum damage of one successful hit.
    pub damage_min: u32,
    /// Maximum damage of one successful hit.
    pub damage_max: u32,
    /// Attacks per second.
    pub attack_speed: f64,
    /// Attack reach in meters.
    pub attack_range: f64,
    /// Attacker miss chance in [0, 1].
    pub miss_chance: f64,
    /// Critical hit chance in [0, 1].
    pub crit_chance: f64,
    /// Damage multiplier on crit (clamped >= 1).
    pub crit_multiplier: f64,
    /// Flat armor penetration (subtracted from target armor).
    pub armor_pen_flat: f64,
    /// Percent armor penetration in [0, 1] (ignores that share of armor).
    pub armor_pen_pct: f64,

    // --- Defense ---
    /// Maximum health.
    pub health: u32,
    /// Health regeneration per second.
    pub health_regen: f64,
    /// Armor against physical damage.
    pub armor: f64,
    /// Resistance against magic damage.
    pub magic_resist: f64,
    /// Chance to fully evade a hit, in [0, 1].
    pub evasion: f64,
    /// Chance to block part of a hit, in [0, 1].
    pub block_chance: f64,

    // --- Mobility / perception ---
    /// Movement speed in m/s.
    pub move_speed: f64,
    /// Radius at which the unit notices and engages enemies.
    pub aggro_radius: f64,
    /// Approach stop distance (kept <= attack_range by clamp).
    pub stop_distance: f64,
}

impl Default for StatBlock {
    fn default() -> Self {
        Self {
            damage_min: 5,
            damage_max: 10,
            attack_speed: 1.0,
            attack_range: 1.8,
            miss_chance: 0.05,
            crit_chance: 0.20,
            crit_multiplier: 1.5,
            armor_pen_flat: 0.0,
            armor_pen_pct: 0.0,
            health: 100,
            health_regen: 0.0,
            armor: 0.0,
            magic_resist: 0.0,
            evasion: 0.0,
            block_chance: 0.0,
            move_speed: 2.5,
            aggro_radius: 6.0,
            stop_distance: 1.4,
        }
    }
}

impl StatBlock {
    /// All-zero block, the identity for bonus application.
    pub fn zeroed() -> Self {
        Self {
            damage_min: 0,
            damage_max: 0,
            attack_speed: 0.0,
            attack_range: 0.0,
            miss_chance: 0.0,
            crit_chance: 0.0,
            crit_multiplier: 0.0,
            armor_pen_flat: 0.0,
            armor_pen_pct: 0.0,
            health: 0,
            health_regen: 0.0,
            armor: 0.0,
            magic_resist: 0.0,
            evasion: 0.0,
            block_chance: 0.0,
            move_speed: 0.0,
            aggro_radius: 0.0,
            stop_distance: 0.0,
        }
    }

    /// Apply flat then percent bonuses, then re-establish invariants.
    pub fn apply_bonuses(&mut self, flat: Option<&StatBlock>, percent: Option<&StatBlock>) {
        if let Some(flat) = flat {
            self.add_flat(flat);
        }
        if let Some(percent) = percent {
            self.add_percent(percent);
        }
        self.clamp();
    }

    /// Field-wise addition of a flat bonus block.
    pub fn add_flat(&mut self, add: &StatBlock) {
        self.damage_min += add.damage_min;
        self.damage_max += add.damage_max;
        self.attack_speed += add.attack_speed;
        self.attack_range += add.attack_range;
        self.miss_chance += add.miss_chance;
        self.crit_chance += add.crit_chance;
        self.crit_multiplier += add.crit_multiplier;
        self.armor_pen_flat += add.armor_pen_flat;
        self.armor_pen_pct += add.armor_pen_pct;
        self.health += add.health;
        self.health_regen += add.health_regen;
        self.armor += add.armor;
        self.magic_resist += add.magic_resist;
        self.evasion += add.evasion;
        self.block_chance += add.block_chance;
        self.move_speed += add.move_speed;
        self.aggro_radius += add.aggro_radius;
        self.stop_distance += add.stop_distance;
    }

    /// Field-wise percent scaling: each field becomes `field * (1 + pct.field)`.
    pub fn add_percent(&mut self, pct: &StatBlock) {
        self.damage_min = scale_u32(self.damage_min, pct.damage_min as f64);
        self.damage_max = scale_u32(self.damage_max, pct.damage_max as f64);
        self.attack_speed *= 1.0 + pct.attack_speed;
        self.attack_range *= 1.0 + pct.attack_range;
        self.miss_chance *= 1.0 + pct.miss_chance;
        self.crit_chance *= 1.0 + pct.crit_chance;
        self.crit_multiplier *= 1.0 + pct.crit_multiplier;
        self.armor_pen_flat *= 1.0 + pct.armor_pen_flat;
        self.armor_pen_pct *= 1.0 + pct.armor_pen_pct;
        self.health = scale_u32(self.health, pct.health as f64);
        self.health_regen *= 1.0 + pct.health_regen;
        self.armor *= 1.0 + pct.armor;
        self.magic_resist *= 1.0 + pct.magic_resist;
        self.evasion *= 1.0 + pct.evasion;
        self.block_chance *= 1.0 + pct.block_chance;
        self.move_speed *= 1.0 + pct.move_speed;
        self.aggro_radius *= 1.0 + pct.aggro_radius;
        self.stop_distance *= 1.0 + pct.stop_distance;
    }

    /// Re-establish stat invariants after bonus application.
    pub fn clamp(&mut self) {
        // Probabilities in [0, 1]
        self.miss_chance = self.miss_chance.clamp(0.0, 1.0);
        self.crit_chance = self.crit_chance.clamp(0.0, 1.0);
        self.armor_pen_pct = self.armor_pen_pct.clamp(0.0, 1.0);
        self.evasion = self.evasion.clamp(0.0, 1.0);
        self.block_chance = self.block_chance.clamp(0.0, 1.0);

        // Non-negative magnitudes, ordered damage range
        self.damage_max = self.damage_max.max(self.damage_min);
        self.attack_speed = self.attack_speed.max(0.0);
        self.attack_range = self.attack_range.max(0.0);
        self.crit_multiplier = self.crit_multiplier.max(1.0);
        self.armor_pen_flat = self.armor_pen_flat.max(0.0);

        self.health = self.health.max(1);
        self.health_regen = self.health_regen.max(0.0);
        self.armor = self.armor.max(0.0);
        self.magic_resist = self.magic_resist.max(0.0);

        self.move_speed = self.move_speed.max(0.0);
        self.aggro_radius = self.aggro_radius.max(0.0);
        self.stop_distance = self.stop_distance.clamp(0.0, self.attack_range);
    }
}

fn scale_u32(base: u32, pct: f64) -> u32 {
    ((base as f64) * (1.0 + pct)).round().max(0.0) as u32
}

/// One step of building-driven unit leveling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelStep {
    pub level: u32,
    pub flat: StatBlock,
    pub percent: StatBlock,
}

impl LevelStep {
    pub fn new(level: u32) -> Self {
        Self {
            level,
            flat: StatBlock::zeroed(),
            percent: StatBlock::zeroed(),
        }
    }
}

/// One rank earned through kills, with its stat bonuses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankStep {
    pub name: String,
    pub required_kills: u32,
    pub flat: StatBlock,
    pub percent: StatBlock,
}

/// Static unit archetype: base stats plus progression tables.
/// Pure configuration, no runtime state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Archetype {
    pub name: String,
    pub base: StatBlock,
    /// Level steps indexed by `level - 1`. Empty = no leveling.
    pub levels: Vec<LevelStep>,
    /// Ranks in ascending kill-requirement order. Empty = no ranks.
    pub ranks: Vec<RankStep>,
}

impl Archetype {
    pub fn new(name: impl Into<String>, base: StatBlock) -> Self {
        Self {
            name: name.into(),
            base,
            levels: Vec::new(),
            ranks: Vec::new(),
        }
    }

    /// Recompute effective stats for a level and rank from the base block.
    pub fn stats_at(&self, level: u32, rank_index: Option<usize>) -> StatBlock {
        let mut stats = self.base.clone();
        if let Some(step) = self.levels.get(level.saturating_sub(1) as usize) {
            stats.apply_bonuses(Some(&step.flat), Some(&step.percent));
        }
        if let Some(rank) = rank_index.and_then(|i| self.ranks.get(i)) {
            stats.apply_bonuses(Some(&rank.flat), Some(&rank.percent));
        }
        stats.clamp();
        stats
    }

    /// Highest rank whose kill requirement is met, if any.
    pub fn rank_for_kills(&self, kills: u32) -> Option<usize> {
        self.ranks
            .iter()
            .enumerate()
            .filter(|(_, r)| kills >= r.required_kills)
            .max_by_key(|(_, r)| r.required_kills)
            .map(|(i, _)| i)
    }
}
