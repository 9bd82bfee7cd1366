//! Cleanup: corpse despawn and the periodic occupancy sweep.

use hecs::{Entity, World};

use warband_core::components::{UnitId, UnitVitals};
use warband_core::constants::*;

use crate::occupancy::OccupancyTracker;
use crate::roster::UnitRoster;

/// Despawn corpses past their linger time and, on the sweep cadence,
/// drop occupancy claims that leaked past the death path.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(
    world: &mut World,
    roster: &mut UnitRoster,
    occupancy: &mut OccupancyTracker,
    despawn_buffer: &mut Vec<(Entity, u32)>,
    now: f64,
    tick: u64,
) {
    despawn_buffer.clear();

    for (entity, (id, vitals)) in world.query_mut::<(&UnitId, &UnitVitals)>() {
        if let Some(died_at) = vitals.died_at {
            if now - died_at >= CORPSE_LINGER_SECS {
                despawn_buffer.push((entity, id.0));
            }
        }
    }

    for (entity, unit) in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
        roster.forget(unit);
        occupancy.release(unit);
        occupancy.clear_target(unit);
    }

    if tick % OCCUPANCY_SWEEP_INTERVAL_TICKS == 0 {
        occupancy.sweep(|unit| roster.is_alive(unit));
    }
}
