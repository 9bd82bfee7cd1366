#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use warband_core::config::{AgentConfig, LodConfig};
    use warband_core::constants::*;
    use warband_core::types::Vec3;

    use crate::lod::{sample_interval, PerceptionLod};
    use crate::steering::{
        bypass, cohesion_sample, isolation, separation, steer, CohesionSample, SteeringContext,
    };
    use crate::targeting::{
        all_saturated, bias_strength, select_target, select_target_biased, CentroidBias,
        TargetCandidate,
    };

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn context<'a>(
        position: Vec3,
        target: Vec3,
        config: &'a AgentConfig,
    ) -> SteeringContext<'a> {
        SteeringContext {
            position,
            target_position: target,
            move_speed: 2.5,
            stop_radius: 1.4,
            orbit_radius: 1.4,
            orbit_sign: 1.0,
            separation_push: Vec3::ZERO,
            bypass_push: Vec3::ZERO,
            cohesion: CohesionSample::default(),
            config,
        }
    }

    // ---- Steering sensors ----

    #[test]
    fn test_separation_pushes_away_from_close_ally() {
        let push = separation(Vec3::ZERO, &[Vec3::new(0.3, 0.0, 0.0)], 0.6);
        assert!(push.x < 0.0, "push should point away from the ally");
        assert_eq!(push.z, 0.0);
        // Linear falloff: ally at half radius pushes with half weight
        assert!((push.length() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_separation_ignores_allies_outside_radius() {
        let push = separation(Vec3::ZERO, &[Vec3::new(2.0, 0.0, 0.0)], 0.6);
        assert_eq!(push, Vec3::ZERO);
    }

    #[test]
    fn test_bypass_triggers_only_for_ally_ahead() {
        let ahead = Vec3::new(0.0, 0.0, 0.5);
        let behind = Vec3::new(0.0, 0.0, -0.5);

        let push = bypass(Vec3::ZERO, Vec3::Z, &[ahead], 0.9, 1.0);
        assert!(push.length() > 0.0, "ally dead ahead must trigger a dodge");
        assert!(push.dot(Vec3::Z).abs() < 1e-9, "dodge is purely lateral");

        let push = bypass(Vec3::ZERO, Vec3::Z, &[behind], 0.9, 1.0);
        assert_eq!(push, Vec3::ZERO);
    }

    #[test]
    fn test_bypass_side_follows_orbit_sign() {
        let ahead = Vec3::new(0.0, 0.0, 0.5);
        let right = bypass(Vec3::ZERO, Vec3::Z, &[ahead], 0.9, 1.0);
        let left = bypass(Vec3::ZERO, Vec3::Z, &[ahead], 0.9, -1.0);
        assert!((right + left).length() < 1e-9, "opposite signs dodge opposite ways");
    }

    #[test]
    fn test_cohesion_sample_and_isolation() {
        let allies = [Vec3::new(4.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 2.0)];
        let sample = cohesion_sample(Vec3::ZERO, &allies, 6.0);
        assert_eq!(sample.count, 2);
        assert!(sample.direction.x > 0.9, "centroid lies along +x");
        assert!((sample.centroid_distance - Vec3::new(4.0, 0.0, 1.0).length()).abs() < 1e-9);

        // Centroid just past the threshold: small positive isolation
        let iso = isolation(&sample, 3.0, 6.0);
        assert!(iso > 0.0 && iso < 1.0);

        // Grows to one at the cohesion radius
        let far = CohesionSample {
            direction: Vec3::X,
            count: 1,
            centroid_distance: 6.0,
        };
        assert_eq!(isolation(&far, 3.0, 6.0), 1.0);
        let midway = CohesionSample {
            centroid_distance: 4.5,
            ..far
        };
        assert!((isolation(&midway, 3.0, 6.0) - 0.5).abs() < 1e-9);

        // No allies in range: no pack to stray from
        let lonely = cohesion_sample(Vec3::ZERO, &[], 6.0);
        assert_eq!(isolation(&lonely, 3.0, 6.0), 0.0);
    }

    // ---- Steering composition ----

    #[test]
    fn test_steer_approaches_distant_target_at_full_speed() {
        let config = AgentConfig::default();
        let ctx = context(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), &config);
        let out = steer(&ctx);
        assert!(!out.arrived);
        assert!((out.velocity.length() - 2.5).abs() < 1e-9);
        assert!(out.velocity.z > 0.0, "moves toward the target");
    }

    #[test]
    fn test_steer_approach_speed_blends_across_slow_band() {
        let config = AgentConfig::default();

        // Just outside the stop radius: walking pace.
        let ctx = context(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.41), &config);
        let out = steer(&ctx);
        assert!(!out.arrived);
        assert!((out.velocity.length() - 2.5 * WALK_COEF).abs() < 0.01);

        // Halfway through the band: halfway between walk and run.
        let ctx = context(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.4 + SLOW_RANGE * 0.5), &config);
        let out = steer(&ctx);
        let expected = 2.5 * (WALK_COEF + (1.0 - WALK_COEF) * 0.5);
        assert!((out.velocity.length() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_steer_orbits_inside_stop_radius() {
        let config = AgentConfig::default();
        let mut ctx = context(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), &config);
        // Inside the ring the radial spring pushes back out while the
        // tangent keeps the agent circling.
        let out = steer(&ctx);
        assert!(out.arrived);
        assert!(out.velocity.z < 0.0, "inside the ring pushes back out");
        assert!(out.velocity.x.abs() > 0.0, "orbiting has a tangential part");

        // A strayed agent is dampened and pulled back toward its pack.
        ctx.cohesion = CohesionSample {
            direction: Vec3::X,
            count: 3,
            centroid_distance: config.cohesion_radius,
        };
        let pulled = steer(&ctx);
        assert!(pulled.arrived);
        assert!(
            pulled.velocity.x > out.velocity.x,
            "cohesion pull shows up in the orbit velocity"
        );
    }

    #[test]
    fn test_steer_orbit_composition() {
        // Exact composition of the orbit velocity: dampened tangent,
        // radial spring, reduced separation, isolation-scaled cohesion.
        let config = AgentConfig::default();
        let mut ctx = context(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), &config);
        ctx.separation_push = Vec3::new(0.5, 0.0, 0.0);
        ctx.cohesion = CohesionSample {
            direction: Vec3::X,
            count: 2,
            centroid_distance: 4.5, // halfway between threshold and radius
        };
        let out = steer(&ctx);

        let iso = 0.5;
        let orbit_speed = config.orbit_side_speed * (1.0 - iso * config.orbit_isolation_dampen);
        let expected_x = orbit_speed
            + 0.5 * config.separation_strength * ORBIT_SEPARATION_SCALE
            + config.cohesion_strength * iso;
        let expected_z = (1.0 - 1.4) * config.orbit_radial_gain;
        assert!((out.velocity.x - expected_x).abs() < 1e-9);
        assert!((out.velocity.z - expected_z).abs() < 1e-9);
    }

    // ---- Targeting ----

    #[test]
    fn test_select_prefers_uncrowded_target() {
        // Crowded candidate is slightly closer, but the per-attacker
        // penalty outweighs the distance edge.
        let candidates = [
            TargetCandidate {
                position: Vec3::new(0.0, 0.0, 3.0),
                occupancy: 1,
            },
            TargetCandidate {
                position: Vec3::new(0.0, 0.0, 4.0),
                occupancy: 0,
            },
        ];
        assert_eq!(select_target(Vec3::ZERO, &candidates), Some(1));
    }

    #[test]
    fn test_select_hard_blocks_saturated_when_alternative_exists() {
        // Saturated candidate right next to the agent, free one far away:
        // the cap still wins.
        let candidates = [
            TargetCandidate {
                position: Vec3::new(0.0, 0.0, 1.0),
                occupancy: MAX_ATTACKERS_PER_TARGET,
            },
            TargetCandidate {
                position: Vec3::new(0.0, 0.0, 200.0),
                occupancy: 1,
            },
        ];
        assert_eq!(select_target(Vec3::ZERO, &candidates), Some(1));
    }

    #[test]
    fn test_select_waives_cap_when_everyone_is_saturated() {
        let candidates = [
            TargetCandidate {
                position: Vec3::new(0.0, 0.0, 5.0),
                occupancy: 2,
            },
            TargetCandidate {
                position: Vec3::new(0.0, 0.0, 2.0),
                occupancy: 3,
            },
        ];
        assert!(all_saturated(&candidates, MAX_ATTACKERS_PER_TARGET));
        // Cap waived: nearest wins despite higher occupancy... almost.
        // Distance 2 + penalty 6 = 8 vs distance 5 + penalty 4 = 9.
        assert_eq!(select_target(Vec3::ZERO, &candidates), Some(1));
    }

    #[test]
    fn test_select_tie_keeps_first_candidate() {
        let twin = TargetCandidate {
            position: Vec3::new(0.0, 0.0, 3.0),
            occupancy: 0,
        };
        assert_eq!(select_target(Vec3::ZERO, &[twin, twin]), Some(0));
    }

    #[test]
    fn test_select_empty_returns_none() {
        assert_eq!(select_target(Vec3::ZERO, &[]), None);
    }

    #[test]
    fn test_centroid_bias_pulls_selection_toward_pack() {
        let candidates = [
            TargetCandidate {
                position: Vec3::new(0.0, 0.0, 4.0),
                occupancy: 0,
            },
            TargetCandidate {
                position: Vec3::new(0.0, 0.0, -5.0),
                occupancy: 0,
            },
        ];
        // Unbiased: nearer candidate wins.
        assert_eq!(select_target(Vec3::ZERO, &candidates), Some(0));

        // Pack sits behind the agent; a strong bias flips the choice.
        let bias = CentroidBias {
            centroid: Vec3::new(0.0, 0.0, -6.0),
            strength: 1.0,
        };
        assert_eq!(select_target_biased(Vec3::ZERO, &candidates, Some(&bias)), Some(1));
    }

    #[test]
    fn test_bias_strength_scales_with_isolation() {
        let config = AgentConfig::default();
        let calm = bias_strength(&config, 0.0);
        let lost = bias_strength(&config, 1.0);
        assert!((calm - config.cohesion_target_bias).abs() < 1e-12);
        assert!(
            (lost - config.cohesion_target_bias * config.isolation_bias_multiplier).abs() < 1e-12
        );
    }

    // ---- Perception LOD ----

    #[test]
    fn test_sample_interval_throttles_offscreen_and_far() {
        let config = LodConfig::default();
        let onscreen = sample_interval(&config, true, 1.0);
        let offscreen = sample_interval(&config, false, 1.0);
        let far = sample_interval(&config, true, config.far_distance + 1.0);
        assert!((onscreen - 1.0 / config.onscreen_hz).abs() < 1e-12);
        assert!((offscreen - 1.0 / config.offscreen_hz).abs() < 1e-12);
        assert!((far - 1.0 / config.far_hz).abs() < 1e-12);
        assert!(offscreen > far && far > onscreen);
    }

    #[test]
    fn test_lod_reuses_cached_value_between_deadlines() {
        let config = LodConfig::default();
        let mut rng = rng();
        let mut lod = PerceptionLod::new(0.0, &mut rng);

        let mut scans = 0;
        // First call past every possible stagger: must scan.
        let value = lod.separation(1.0, &config, 1.0, &mut rng, || {
            scans += 1;
            Vec3::X
        });
        assert_eq!(scans, 1);
        assert_eq!(value, Vec3::X);

        // Immediately after, well before any rescheduled deadline: cache.
        let value = lod.separation(1.001, &config, 1.0, &mut rng, || {
            scans += 1;
            Vec3::Z
        });
        assert_eq!(scans, 1, "second call must hit the cache");
        assert_eq!(value, Vec3::X);

        // Past the worst-case onscreen interval with jitter: rescan.
        let worst = (1.0 / config.onscreen_hz) * (1.0 + config.jitter);
        let value = lod.separation(1.0 + worst + 1e-9, &config, 1.0, &mut rng, || {
            scans += 1;
            Vec3::Z
        });
        assert_eq!(scans, 2);
        assert_eq!(value, Vec3::Z);
    }

    #[test]
    fn test_lod_disabled_samples_every_call() {
        let config = LodConfig {
            enabled: false,
            ..LodConfig::default()
        };
        let mut rng = rng();
        let mut lod = PerceptionLod::new(0.0, &mut rng);

        let mut scans = 0;
        for _ in 0..3 {
            lod.bypass(0.0, &config, 1.0, &mut rng, || {
                scans += 1;
                Vec3::ZERO
            });
        }
        assert_eq!(scans, 3);
    }

    #[test]
    fn test_visibility_check_cadence() {
        let mut rng = rng();
        let mut lod = PerceptionLod::new(0.0, &mut rng);

        assert!(lod.take_visibility_check(0.0), "first check fires immediately");
        assert!(!lod.take_visibility_check(0.5));
        assert!(lod.take_visibility_check(VISIBILITY_CHECK_INTERVAL));
    }
}
