//! Configuration surfaces: per-agent tunables, shared contact-filter
//! defaults, perception LOD settings, and the viewport fallback.

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// Contact filters applied when a hit resolves: front-arc and
/// line-of-sight gating. One shared instance acts as the global default;
/// an agent may override it locally (see `AgentConfig::override_contact`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSettings {
    /// Require the target to lie within the attacker's frontal cone.
    pub use_front_arc: bool,
    /// Full width of the frontal cone in degrees (180 = half-space ahead).
    pub front_arc_angle_deg: f64,
    /// Require an unobstructed segment between attacker and target.
    pub use_los: bool,
    /// Height above the attacker's feet where the LOS ray starts.
    pub los_ray_height: f64,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            use_front_arc: true,
            front_arc_angle_deg: 150.0,
            use_los: false,
            los_ray_height: 1.2,
        }
    }
}

/// Perception LOD settings: how often the expensive steering sensors are
/// re-evaluated depending on visibility and distance to target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LodConfig {
    pub enabled: bool,
    /// Throttle sensors further when the agent is off-screen.
    pub offscreen_throttle: bool,
    /// Sample frequency (Hz) when on-screen and near the target.
    pub onscreen_hz: f64,
    /// Sample frequency (Hz) when off-screen.
    pub offscreen_hz: f64,
    /// Sample frequency (Hz) when far from the current target.
    pub far_hz: f64,
    /// Distance to target beyond which the far frequency applies.
    pub far_distance: f64,
    /// Random interval spread (± fraction) to desynchronize agents.
    pub jitter: f64,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            offscreen_throttle: true,
            onscreen_hz: 20.0,
            offscreen_hz: 5.0,
            far_hz: 8.0,
            far_distance: 12.0,
            jitter: 0.2,
        }
    }
}

/// Per-agent behavior tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    // --- Approach / orbit ---
    /// Lateral drift mixed into the approach direction.
    pub approach_side_bias: f64,
    /// Tangential speed while orbiting at the stop radius.
    pub orbit_side_speed: f64,
    /// Gain of the radial correction pulling back to the orbit radius.
    pub orbit_radial_gain: f64,
    /// Per-agent random spread of the orbit radius (± meters).
    pub orbit_radius_jitter: f64,

    // --- Avoidance ---
    pub separation_radius: f64,
    pub separation_strength: f64,
    /// How far ahead to look for a path-blocking ally.
    pub bypass_ahead_distance: f64,
    pub bypass_strength: f64,

    // --- Cohesion (anti-runaway) ---
    /// Radius for the ally centroid sample.
    pub cohesion_radius: f64,
    /// Pull toward the pack, scaled by isolation.
    pub cohesion_strength: f64,
    /// Centroid distance past which isolation starts growing.
    pub isolation_threshold: f64,
    /// Orbit speed damping at full isolation, in [0, 1].
    pub orbit_isolation_dampen: f64,

    // --- Smart retarget ---
    pub retarget_check_interval: f64,
    /// Seconds without progress before a retarget is allowed.
    pub retarget_after_stuck: f64,
    /// Score bias toward candidates near the ally centroid.
    pub cohesion_target_bias: f64,
    /// Bias amplification at full isolation.
    pub isolation_bias_multiplier: f64,
    /// Isolation level that by itself triggers a retarget, in [0, 1].
    pub isolation_retarget_threshold: f64,

    // --- Contact filters ---
    /// Use the local `contact` block instead of the shared defaults.
    pub override_contact: bool,
    pub contact: ContactSettings,

    pub lod: LodConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            approach_side_bias: 0.35,
            orbit_side_speed: 0.8,
            orbit_radial_gain: 1.2,
            orbit_radius_jitter: 0.15,
            separation_radius: 0.6,
            separation_strength: 1.2,
            bypass_ahead_distance: 0.9,
            bypass_strength: 0.8,
            cohesion_radius: 6.0,
            cohesion_strength: 0.8,
            isolation_threshold: 3.0,
            orbit_isolation_dampen: 0.6,
            retarget_check_interval: 0.5,
            retarget_after_stuck: 1.6,
            cohesion_target_bias: 0.35,
            isolation_bias_multiplier: 2.0,
            isolation_retarget_threshold: 0.6,
            override_contact: false,
            contact: ContactSettings::default(),
            lod: LodConfig::default(),
        }
    }
}

/// World-space viewport rectangle for the manual visibility fallback,
/// used when no engine visibility signal is installed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Viewport {
    pub fn contains(&self, position: &Position) -> bool {
        let p = position.0;
        p.x >= self.min_x && p.x <= self.max_x && p.z >= self.min_z && p.z <= self.max_z
    }
}
