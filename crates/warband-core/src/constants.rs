//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Movement feel ---

/// Turn rate toward the current target (fraction per second, slerp-like).
pub const TURN_SPEED: f64 = 10.0;

/// Band before the stop radius over which approach speed blends walk -> run.
pub const SLOW_RANGE: f64 = 2.5;

/// Walk speed as a fraction of full move speed.
pub const WALK_COEF: f64 = 0.6;

/// Smoothing rate for the animation move-blend value (units per second).
pub const MOVE_BLEND_SPEED: f64 = 6.0;

/// Lower bound applied to a unit's stop distance.
pub const MIN_STOP_DISTANCE: f64 = 0.5;

/// Lower bound applied to the desired orbit radius.
pub const MIN_ORBIT_RADIUS: f64 = 0.2;

// --- Attacker cap on a single target ---

/// Soft cap on simultaneous attackers committed to one target.
pub const MAX_ATTACKERS_PER_TARGET: u32 = 2;

/// Linear score penalty per attacker already on a candidate.
pub const OCCUPANCY_PENALTY_PER_ATTACKER: f64 = 2.0;

/// Large fixed penalty that effectively excludes a saturated candidate
/// (applied only while at least one unsaturated target exists).
pub const HARD_BLOCK_PENALTY: f64 = 1000.0;

// --- Attack timing / contact ---

/// Reach tolerance added to the stop distance when resolving a hit.
pub const EXTRA_HIT_RANGE: f64 = 0.4;

/// Point within the attack window at which the hit resolves (fraction of
/// the window duration), used by the fallback timer and external cues alike.
pub const HIT_TIME_NORMALIZED: f64 = 0.4;

/// Floor on attack speed to keep the window duration finite.
pub const MIN_ATTACK_SPEED: f64 = 0.1;

/// Reaching within this margin of the stop radius counts as progress
/// for the stuck-retarget clock.
pub const PROGRESS_EPSILON: f64 = 0.2;

// --- Steering ---

/// Minimum alignment (dot product with the to-target direction) for an
/// ally to count as blocking the path ahead.
pub const BYPASS_ALIGN_THRESHOLD: f64 = 0.85;

/// Separation strength multiplier while orbiting; the ring already
/// spaces attackers out, so the full push would fight the spring.
pub const ORBIT_SEPARATION_SCALE: f64 = 0.6;

// --- Damage mitigation ---

/// Armor softness constant: reduction = armor / (armor + K).
pub const ARMOR_K: f64 = 100.0;

/// Magic resist softness constant (same family as ARMOR_K).
pub const MAGIC_K: f64 = 100.0;

/// Fraction of damage absorbed by a successful block.
pub const BLOCK_REDUCTION: f64 = 0.5;

/// Mitigated damage is floored to this amount when still positive
/// (chip damage guarantee).
pub const MIN_CHIP_DAMAGE: f64 = 1.0;

// --- Line of sight ---

/// Height above the target's feet the LOS ray aims for (torso).
pub const LOS_TORSO_HEIGHT: f64 = 0.5;

// --- Grounding ---

/// Maximum downward snap toward the ground per tick (meters).
pub const GROUND_SNAP_MAX: f64 = 0.6;

/// Ground snap speed (meters per second).
pub const GROUND_SNAP_SPEED: f64 = 20.0;

// --- Perception LOD ---

/// Maximum initial stagger applied to sensor deadlines at spawn (seconds).
pub const LOD_INITIAL_STAGGER: f64 = 0.25;

/// Interval between manual viewport visibility checks (seconds).
pub const VISIBILITY_CHECK_INTERVAL: f64 = 0.75;

// --- Cleanup ---

/// Ticks between periodic occupancy stale-entry sweeps.
pub const OCCUPANCY_SWEEP_INTERVAL_TICKS: u64 = 30;

/// Seconds a corpse stays in the world before despawn.
pub const CORPSE_LINGER_SECS: f64 = 5.0;
