//! Simulation engine for WARBAND.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces `BattleSnapshot`s for frontends and tests.

pub mod agent;
pub mod engine;
pub mod events;
pub mod occupancy;
pub mod roster;
pub mod spatial;
pub mod systems;
pub mod world_setup;

pub use engine::BattleEngine;
pub use warband_core as core;
