//! Agent AI for WARBAND.
//!
//! Melee steering, target selection, and perception LOD scheduling.
//! Pure functions over plain data — no ECS dependency. The sim layer
//! gathers neighbor positions and candidate lists and feeds them in.

pub mod lod;
pub mod steering;
pub mod targeting;

pub use warband_core as core;

#[cfg(test)]
mod tests;
