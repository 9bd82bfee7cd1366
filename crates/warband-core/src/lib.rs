//! Core types and definitions for the WARBAND battle simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, stats, configuration, events, and constants.
//! It has no dependency on the ECS or any runtime framework.

pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod stats;
pub mod types;

#[cfg(test)]
mod tests;
