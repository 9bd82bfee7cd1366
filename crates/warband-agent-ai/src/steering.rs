//! Melee steering: approach, orbit-in-place, ally separation, bypass of
//! path-blocking allies, and pack cohesion.
//!
//! The sensor functions (`separation`, `bypass`, `cohesion_sample`) are
//! the expensive neighbor scans; their outputs are cached by the
//! perception LOD and composed every tick by `steer`.

use warband_core::config::AgentConfig;
use warband_core::constants::*;
use warband_core::types::{flatten, perp_right, Vec3};

/// Ally centroid sample used for cohesion steering and retarget bias.
#[derive(Debug, Clone, Copy, Default)]
pub struct CohesionSample {
    /// Unit ground-plane direction toward the ally centroid (zero when alone).
    pub direction: Vec3,
    /// Allies inside the cohesion radius.
    pub count: usize,
    /// Ground distance to the centroid.
    pub centroid_distance: f64,
}

/// How far the agent has strayed from its pack, in [0, 1]. Grows from
/// zero at `threshold` to one at `cohesion_radius`. An agent with no
/// allies in range has no pack to stray from and counts as not isolated.
pub fn isolation(sample: &CohesionSample, threshold: f64, cohesion_radius: f64) -> f64 {
    if sample.count == 0 {
        return 0.0;
    }
    let span = (cohesion_radius - threshold).max(0.001);
    ((sample.centroid_distance - threshold) / span).clamp(0.0, 1.0)
}

/// Summed push away from allies closer than `radius`. Falls off linearly
/// with distance. Unscaled; `steer` applies the configured strength.
pub fn separation(position: Vec3, neighbors: &[Vec3], radius: f64) -> Vec3 {
    if radius <= 0.0 {
        return Vec3::ZERO;
    }
    let mut push = Vec3::ZERO;
    for &neighbor in neighbors {
        let offset = flatten(position - neighbor);
        let dist = offset.length();
        if dist < 1e-6 || dist >= radius {
            continue;
        }
        push += offset / dist * ((radius - dist) / radius);
    }
    push
}

/// Lateral push around the nearest ally standing in the desired direction
/// of travel. Returns zero when the path ahead is clear. The agent always
/// dodges to its orbit side so two agents never mirror each other forever.
pub fn bypass(
    position: Vec3,
    desired_dir: Vec3,
    neighbors: &[Vec3],
    ahead_distance: f64,
    orbit_sign: f64,
) -> Vec3 {
    let dir = flatten(desired_dir);
    if dir.length_squared() < 1e-8 || ahead_distance <= 0.0 {
        return Vec3::ZERO;
    }
    let dir = dir.normalize();

    let mut nearest = f64::INFINITY;
    let mut blocked = false;
    for &neighbor in neighbors {
        let offset = flatten(neighbor - position);
        let dist = offset.length();
        if dist < 1e-6 || dist > ahead_distance || dist >= nearest {
            continue;
        }
        if offset.dot(dir) / dist > BYPASS_ALIGN_THRESHOLD {
            nearest = dist;
            blocked = true;
        }
    }

    if blocked {
        perp_right(dir) * orbit_sign
    } else {
        Vec3::ZERO
    }
}

/// Centroid of allies within `radius` of the agent.
pub fn cohesion_sample(position: Vec3, allies: &[Vec3], radius: f64) -> CohesionSample {
    let mut sum = Vec3::ZERO;
    let mut count = 0usize;
    for &ally in allies {
        let offset = flatten(ally - position);
        let dist = offset.length();
        if dist < 1e-6 || dist > radius {
            continue;
        }
        sum += ally;
        count += 1;
    }
    if count == 0 {
        return CohesionSample::default();
    }
    let centroid = sum / count as f64;
    let offset = flatten(centroid - position);
    let dist = offset.length();
    CohesionSample {
        direction: if dist > 1e-6 { offset / dist } else { Vec3::ZERO },
        count,
        centroid_distance: dist,
    }
}

/// Per-agent steering inputs for one tick. Sensor outputs come from the
/// perception LOD cache, not from a fresh scan.
pub struct SteeringContext<'a> {
    pub position: Vec3,
    pub target_position: Vec3,
    pub move_speed: f64,
    /// Engagement radius: inside it the agent stops approaching and
    /// orbits instead (stat stop distance, floored).
    pub stop_radius: f64,
    /// Ring the orbit spring pulls toward (stop radius plus jitter).
    pub orbit_radius: f64,
    /// Fixed orbit direction, +1 or -1, rolled at spawn.
    pub orbit_sign: f64,
    pub separation_push: Vec3,
    pub bypass_push: Vec3,
    pub cohesion: CohesionSample,
    pub config: &'a AgentConfig,
}

/// Steering output: ground-plane velocity and the direction to face.
pub struct Steering {
    pub velocity: Vec3,
    pub face_dir: Vec3,
    /// True when inside the stop radius (close enough to attack).
    pub arrived: bool,
}

/// Compose the cached sensor outputs into a velocity.
///
/// Outside the stop radius the agent approaches with a sideways bias
/// (so several attackers fan out instead of stacking on one line),
/// blending from walk up to full speed across the slow band. Inside it
/// circles the target, held on the orbit ring by a radial spring and
/// pulled back toward the pack when it has strayed.
pub fn steer(ctx: &SteeringContext) -> Steering {
    let cfg = ctx.config;
    let to_target = flatten(ctx.target_position - ctx.position);
    let dist = to_target.length();
    let face_dir = if dist > 1e-6 { to_target / dist } else { Vec3::ZERO };

    let iso = isolation(&ctx.cohesion, cfg.isolation_threshold, cfg.cohesion_radius);
    let cohesion_pull = ctx.cohesion.direction * cfg.cohesion_strength * iso;
    let stop = ctx.stop_radius.max(MIN_STOP_DISTANCE);

    if dist <= stop {
        let ring = ctx.orbit_radius.max(MIN_ORBIT_RADIUS);
        let orbit_speed = cfg.orbit_side_speed * (1.0 - iso * cfg.orbit_isolation_dampen);
        let tangent = perp_right(face_dir) * ctx.orbit_sign * orbit_speed;
        let radial = face_dir * (dist - ring) * cfg.orbit_radial_gain;
        let separation =
            ctx.separation_push * (cfg.separation_strength * ORBIT_SEPARATION_SCALE);
        let velocity = flatten(tangent + radial + separation + cohesion_pull);
        return Steering {
            velocity,
            face_dir,
            arrived: true,
        };
    }

    let mut dir = face_dir;
    dir += perp_right(face_dir) * ctx.orbit_sign * cfg.approach_side_bias;
    dir += ctx.separation_push * cfg.separation_strength;
    dir += ctx.bypass_push * cfg.bypass_strength;
    dir += cohesion_pull;
    let dir = flatten(dir);

    // Walk at the stop radius, full speed past the slow band.
    let t = ((dist - stop) / SLOW_RANGE).clamp(0.0, 1.0);
    let speed = ctx.move_speed * (WALK_COEF + (1.0 - WALK_COEF) * t);
    let velocity = if dir.length_squared() > 1e-8 {
        dir.normalize() * speed
    } else {
        Vec3::ZERO
    };

    Steering {
        velocity,
        face_dir,
        arrived: false,
    }
}
