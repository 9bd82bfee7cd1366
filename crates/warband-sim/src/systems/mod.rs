//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` plus the engine-owned
//! trackers. They do not own state — all per-unit state lives in
//! components, all cross-unit state in the roster and occupancy tracker.

pub mod attack;
pub mod cleanup;
pub mod damage;
pub mod movement;
pub mod perception;
pub mod snapshot;
pub mod targeting;
