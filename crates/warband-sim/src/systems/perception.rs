//! Visibility maintenance for the perception LOD.
//!
//! Runs the cheap manual viewport check on its own cadence; the LOD
//! schedulers pick up the result when choosing sensor intervals.

use hecs::World;

use warband_core::components::UnitVitals;
use warband_core::config::Viewport;
use warband_core::types::Position;

use crate::agent::CombatAgent;

pub fn run(world: &mut World, viewport: Option<&Viewport>, now: f64) {
    for (_entity, (agent, position, vitals)) in
        world.query_mut::<(&mut CombatAgent, &Position, &UnitVitals)>()
    {
        if !vitals.is_alive() || !agent.lod.take_visibility_check(now) {
            continue;
        }
        // No viewport installed means everything counts as on-screen.
        let visible = viewport.map_or(true, |v| v.contains(position));
        agent.lod.set_visible(visible);
    }
}
