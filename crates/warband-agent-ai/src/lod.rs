//! Perception LOD: throttles the expensive steering sensors.
//!
//! Each sensor keeps its own cached value and next-due time. Between
//! deadlines the cached value is reused; at the deadline the caller's
//! closure is invoked and a new deadline is scheduled with jitter so
//! whole squads never resample on the same tick.

use rand::Rng;

use warband_core::config::LodConfig;
use warband_core::constants::*;
use warband_core::types::Vec3;

use crate::steering::CohesionSample;

/// Per-agent sensor scheduler and cache.
#[derive(Debug, Clone)]
pub struct PerceptionLod {
    /// Last known on-screen state, refreshed by the visibility system.
    pub visible: bool,
    /// When the manual viewport check is next due.
    pub next_visibility_check: f64,
    next_separation: f64,
    next_bypass: f64,
    next_cohesion: f64,
    cached_separation: Vec3,
    cached_bypass: Vec3,
    cached_cohesion: CohesionSample,
}

impl PerceptionLod {
    /// New scheduler with staggered initial deadlines. Each sensor gets a
    /// different stagger span so the three scans never line up.
    pub fn new(now: f64, rng: &mut impl Rng) -> Self {
        Self {
            visible: true,
            next_visibility_check: now,
            next_separation: now + stagger(rng, LOD_INITIAL_STAGGER),
            next_bypass: now + stagger(rng, LOD_INITIAL_STAGGER * 0.7),
            next_cohesion: now + stagger(rng, LOD_INITIAL_STAGGER * 0.4),
            cached_separation: Vec3::ZERO,
            cached_bypass: Vec3::ZERO,
            cached_cohesion: CohesionSample::default(),
        }
    }

    /// Whether the manual visibility check is due, advancing its clock.
    pub fn take_visibility_check(&mut self, now: f64) -> bool {
        if now < self.next_visibility_check {
            return false;
        }
        self.next_visibility_check = now + VISIBILITY_CHECK_INTERVAL;
        true
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Separation push, rescanning via `sample` only when due.
    pub fn separation(
        &mut self,
        now: f64,
        config: &LodConfig,
        target_distance: f64,
        rng: &mut impl Rng,
        sample: impl FnOnce() -> Vec3,
    ) -> Vec3 {
        if !config.enabled || now >= self.next_separation {
            self.cached_separation = sample();
            self.next_separation =
                reschedule(now, sample_interval(config, self.visible, target_distance), config, rng);
        }
        self.cached_separation
    }

    /// Bypass push, rescanning via `sample` only when due.
    pub fn bypass(
        &mut self,
        now: f64,
        config: &LodConfig,
        target_distance: f64,
        rng: &mut impl Rng,
        sample: impl FnOnce() -> Vec3,
    ) -> Vec3 {
        if !config.enabled || now >= self.next_bypass {
            self.cached_bypass = sample();
            self.next_bypass =
                reschedule(now, sample_interval(config, self.visible, target_distance), config, rng);
        }
        self.cached_bypass
    }

    /// Cohesion sample, rescanning via `sample` only when due.
    pub fn cohesion(
        &mut self,
        now: f64,
        config: &LodConfig,
        target_distance: f64,
        rng: &mut impl Rng,
        sample: impl FnOnce() -> CohesionSample,
    ) -> CohesionSample {
        if !config.enabled || now >= self.next_cohesion {
            self.cached_cohesion = sample();
            self.next_cohesion =
                reschedule(now, sample_interval(config, self.visible, target_distance), config, rng);
        }
        self.cached_cohesion
    }
}

/// Base resample interval for the current situation. Off-screen and
/// far-from-target throttles stack by taking the lowest applicable rate.
pub fn sample_interval(config: &LodConfig, visible: bool, target_distance: f64) -> f64 {
    let mut hz = config.onscreen_hz;
    if config.offscreen_throttle && !visible {
        hz = hz.min(config.offscreen_hz);
    }
    if target_distance > config.far_distance {
        hz = hz.min(config.far_hz);
    }
    if hz <= 0.0 {
        hz = config.onscreen_hz.max(1.0);
    }
    1.0 / hz
}

fn reschedule(now: f64, interval: f64, config: &LodConfig, rng: &mut impl Rng) -> f64 {
    let jitter = config.jitter.max(0.0);
    let factor = if jitter > 0.0 {
        1.0 + rng.gen_range(-jitter..=jitter)
    } else {
        1.0
    };
    now + interval * factor
}

fn stagger(rng: &mut impl Rng, span: f64) -> f64 {
    if span > 0.0 {
        rng.gen_range(0.0..span)
    } else {
        0.0
    }
}
