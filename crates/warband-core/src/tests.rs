#[cfg(test)]
mod tests {
    use crate::components::{Facing, UnitVitals};
    use crate::config::Viewport;
    use crate::stats::{Archetype, RankStep, StatBlock};
    use crate::types::{perp_right, Position, SimTime, Vec3};

    #[test]
    fn test_statblock_clamp_invariants() {
        let mut stats = StatBlock {
            miss_chance: 1.7,
            crit_chance: -0.3,
            crit_multiplier: 0.4,
            damage_min: 20,
            damage_max: 10,
            health: 0,
            stop_distance: 5.0,
            attack_range: 2.0,
            ..StatBlock::default()
        };
        stats.clamp();

        assert_eq!(stats.miss_chance, 1.0);
        assert_eq!(stats.crit_chance, 0.0);
        assert!(stats.crit_multiplier >= 1.0, "crits must never reduce damage");
        assert_eq!(stats.damage_max, 20, "damage_max is raised to damage_min");
        assert_eq!(stats.health, 1);
        assert_eq!(stats.stop_distance, 2.0, "stop distance capped at attack range");
    }

    #[test]
    fn test_statblock_flat_then_percent_bonuses() {
        let mut stats = StatBlock::default(); // 100 health, 2.5 move speed
        let mut flat = StatBlock::zeroed();
        flat.health = 20;
        let mut percent = StatBlock::zeroed();
        percent.move_speed = 0.2;

        stats.apply_bonuses(Some(&flat), Some(&percent));

        assert_eq!(stats.health, 120, "flat bonus applies before percent");
        assert!((stats.move_speed - 2.5 * 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_archetype_rank_for_kills() {
        let mut arch = Archetype::new("grunt", StatBlock::default());
        arch.ranks = vec![
            RankStep {
                name: "Veteran".into(),
                required_kills: 3,
                ..Default::default()
            },
            RankStep {
                name: "Champion".into(),
                required_kills: 8,
                ..Default::default()
            },
        ];

        assert_eq!(arch.rank_for_kills(0), None);
        assert_eq!(arch.rank_for_kills(3), Some(0));
        assert_eq!(arch.rank_for_kills(7), Some(0));
        assert_eq!(arch.rank_for_kills(8), Some(1));
        assert_eq!(arch.rank_for_kills(100), Some(1));
    }

    #[test]
    fn test_vitals_damage_and_death_transition() {
        let mut vitals = UnitVitals::new(50);
        assert!(vitals.is_alive());

        assert!(!vitals.take_damage(30.0, 1.0));
        assert!((vitals.current_health - 20.0).abs() < 1e-12);

        assert!(vitals.take_damage(25.0, 2.0), "crossing zero reports death once");
        assert_eq!(vitals.current_health, 0.0);
        assert!(!vitals.is_alive());
        assert_eq!(vitals.died_at, Some(2.0));

        assert!(!vitals.take_damage(10.0, 3.0), "damage to a corpse is a no-op");
        assert_eq!(vitals.died_at, Some(2.0));
    }

    #[test]
    fn test_vitals_heal_clamps_at_max() {
        let mut vitals = UnitVitals::new(100);
        vitals.take_damage(10.0, 0.0);

        let applied = vitals.heal(50.0);
        assert!((applied - 10.0).abs() < 1e-12, "only the missing 10 is restored");
        assert!((vitals.current_health - 100.0).abs() < 1e-12);

        assert_eq!(vitals.heal(5.0), 0.0, "healing at full health restores nothing");
    }

    #[test]
    fn test_facing_turns_toward_direction() {
        let mut facing = Facing::default();
        facing.turn_toward(Vec3::X, 1.0);
        assert!((facing.forward - Vec3::X).length() < 1e-9);

        // Zero direction leaves facing untouched.
        facing.turn_toward(Vec3::ZERO, 1.0);
        assert!((facing.forward - Vec3::X).length() < 1e-9);
    }

    #[test]
    fn test_perp_right_is_perpendicular() {
        let dir = Vec3::new(0.6, 0.0, 0.8);
        let right = perp_right(dir);
        assert!(right.dot(dir).abs() < 1e-12);
        assert!((right.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..30 {
            time.advance();
        }
        assert_eq!(time.tick, 30);
        assert!((time.elapsed_secs - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_viewport_contains() {
        let viewport = Viewport {
            min_x: -10.0,
            max_x: 10.0,
            min_z: -5.0,
            max_z: 5.0,
        };
        assert!(viewport.contains(&Position::new(0.0, 3.0, 0.0)));
        assert!(!viewport.contains(&Position::new(11.0, 0.0, 0.0)));
        assert!(!viewport.contains(&Position::new(0.0, 0.0, -6.0)));
    }
}
